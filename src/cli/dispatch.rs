//! Routes an invocation to voice listing or synthesis.

use std::io::{self, Write};

use thiserror::Error;

use crate::backend::{BackendError, SpeechBackend};
use crate::engine::{SynthesisError, SynthesisPipeline};
use crate::voice::VoiceRegistry;

use super::args::{Invocation, SynthesisRequest};

/// Banner printed before the voice list.
pub const VOICES_BANNER: &str = "The following voices are available:";

/// Errors that can occur while carrying out an invocation.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed enumerating voices")]
    Enumeration(#[source] BackendError),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Failed writing output")]
    Output(#[from] io::Error),
}

/// Enumerate voices, carry out `invocation`, then release every voice.
///
/// User-facing lines go to `out`. Voice tokens are released before this
/// returns on every path.
pub fn run<B, W>(backend: &B, invocation: &Invocation, out: &mut W) -> Result<(), DispatchError>
where
    B: SpeechBackend,
    W: Write,
{
    let mut registry: VoiceRegistry<B::Token> = VoiceRegistry::new();
    let count = registry
        .enumerate(backend)
        .map_err(DispatchError::Enumeration)?;
    tracing::debug!(count, "Enumerated voices");

    let result = match invocation {
        Invocation::ListVoices => list_voices(&registry, out),
        Invocation::Synthesize(request) => synthesize(backend, &registry, request),
    };

    registry.release_all();
    result
}

fn list_voices<T, W: Write>(registry: &VoiceRegistry<T>, out: &mut W) -> Result<(), DispatchError> {
    writeln!(out, "{VOICES_BANNER}")?;
    for name in registry.list_names() {
        writeln!(out, "{name}")?;
    }
    out.flush()?;

    Ok(())
}

fn synthesize<B: SpeechBackend>(
    backend: &B,
    registry: &VoiceRegistry<B::Token>,
    request: &SynthesisRequest,
) -> Result<(), DispatchError> {
    let Some(voice) = registry.lookup(&request.voice) else {
        return Err(DispatchError::VoiceNotFound(request.voice.clone()));
    };

    tracing::info!(
        voice = %request.voice,
        text_file = %request.text_file.display(),
        wav_file = %request.wav_file.display(),
        "Synthesizing"
    );

    SynthesisPipeline::new(backend).run(voice, &request.text_file, &request.wav_file)?;
    Ok(())
}
