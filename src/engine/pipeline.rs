//! Text file to WAV synthesis.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::backend::{BackendError, FormatError, SpeechBackend, WaveFormat};

use super::output::inspect_output;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Errors that can occur during synthesis, one per pipeline stage.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Failed setting voice")]
    SetVoice(#[source] BackendError),

    #[error("Failed setting audio format")]
    Format(#[source] FormatError),

    #[error("Failed binding to wav file {}", .path.display())]
    BindOutput {
        path: PathBuf,
        #[source]
        source: BackendError,
    },

    #[error("Failed setting output stream")]
    SetOutput(#[source] BackendError),

    #[error("Failed getting file size for file {}", .path.display())]
    FileSize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed allocating {size} bytes for file {}", .path.display())]
    Allocation { path: PathBuf, size: u64 },

    #[error("Failed opening {} for input", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed reading {} as UTF-8 text", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed speaking the contents of the file")]
    Speak(#[source] BackendError),

    #[error("Failed closing wav file {}", .path.display())]
    CloseOutput {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Renders one text file into one WAV file with a chosen voice.
pub struct SynthesisPipeline<'a, B: SpeechBackend> {
    backend: &'a B,
}

impl<'a, B: SpeechBackend> SynthesisPipeline<'a, B> {
    /// Create a pipeline driving `backend`.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Speak the contents of `input` into `output` using `voice`.
    ///
    /// The output file is created (or truncated) before the input is read,
    /// so a missing input still leaves an empty output behind. The speak
    /// call blocks until the engine has written the whole stream.
    pub fn run(&self, voice: &B::Token, input: &Path, output: &Path) -> Result<(), SynthesisError> {
        self.backend
            .set_voice(voice)
            .map_err(SynthesisError::SetVoice)?;

        let format = WaveFormat::stereo_48khz_16bit().map_err(SynthesisError::Format)?;

        let stream = self
            .backend
            .create_wav_stream(output, &format)
            .map_err(|source| SynthesisError::BindOutput {
                path: output.to_path_buf(),
                source,
            })?;

        self.backend
            .set_output(&stream)
            .map_err(SynthesisError::SetOutput)?;

        let text = read_text(input)?;
        tracing::info!(
            input = %input.display(),
            chars = text.chars().count(),
            "Speaking text file"
        );

        self.backend
            .speak_markup(&text)
            .map_err(SynthesisError::Speak)?;
        drop(text);

        self.backend
            .close_stream(stream)
            .map_err(|source| SynthesisError::CloseOutput {
                path: output.to_path_buf(),
                source,
            })?;

        match inspect_output(output) {
            Ok(summary) => tracing::info!(
                output = %output.display(),
                sample_rate = summary.sample_rate,
                channels = summary.channels,
                duration_secs = summary.duration_secs(),
                "Audio saved"
            ),
            Err(e) => tracing::warn!(
                output = %output.display(),
                error = %e,
                "Could not read back the written wav header"
            ),
        }

        Ok(())
    }
}

/// Read a UTF-8 text file, dropping a leading byte-order mark.
///
/// The buffer is reserved from the file's byte count, which is never less
/// than the number of decoded characters.
pub fn read_text(path: &Path) -> Result<String, SynthesisError> {
    let size = fs::metadata(path)
        .map_err(|source| SynthesisError::FileSize {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let allocation_failed = || SynthesisError::Allocation {
        path: path.to_path_buf(),
        size,
    };
    let capacity = usize::try_from(size).map_err(|_| allocation_failed())?;
    let mut text = String::new();
    text.try_reserve(capacity).map_err(|_| allocation_failed())?;

    let mut file = File::open(path).map_err(|source| SynthesisError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    file.read_to_string(&mut text)
        .map_err(|source| SynthesisError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;

    if text.starts_with(BYTE_ORDER_MARK) {
        text.replace_range(..BYTE_ORDER_MARK.len_utf8(), "");
    }

    Ok(text)
}
