//! Test doubles for the handles a `SpeechBackend` hands out.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BackendError, WaveFormat};

/// Counts how many fake tokens have been released.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Voice token that records its release.
#[derive(Debug)]
pub struct FakeToken {
    pub id: String,
    releases: ReleaseCounter,
}

impl FakeToken {
    pub fn new(id: impl Into<String>, releases: &ReleaseCounter) -> Self {
        Self {
            id: id.into(),
            releases: releases.clone(),
        }
    }
}

impl Drop for FakeToken {
    fn drop(&mut self) {
        self.releases.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// File-backed stream that writes a real (silent) WAV file.
pub struct FakeStream {
    writer: hound::WavWriter<BufWriter<File>>,
}

impl FakeStream {
    pub fn create(path: &Path, format: &WaveFormat) -> Result<Self, BackendError> {
        let writer = hound::WavWriter::create(path, format.spec())
            .map_err(|e| BackendError::Platform(e.to_string()))?;

        Ok(Self { writer })
    }

    pub fn finalize(self) -> Result<(), BackendError> {
        self.writer
            .finalize()
            .map_err(|e| BackendError::Platform(e.to_string()))
    }
}
