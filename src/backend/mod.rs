//! Platform speech service.
//!
//! Provides the trait the rest of the crate talks to and, on Windows, the
//! SAPI 5 implementation behind it.

#[cfg(windows)]
mod sapi;
#[cfg(test)]
pub(crate) mod testing;
mod types;

#[cfg(windows)]
pub use sapi::{ComSession, SapiBackend};
pub use types::{BackendError, FormatError, WAVE_FORMAT_PCM, WaveFormat};

use std::path::Path;

#[cfg(test)]
use testing::{FakeStream, FakeToken};

/// Trait for the platform text-to-speech service.
///
/// Voice tokens and output streams are owned handles; dropping one releases
/// the underlying engine object. This keeps the rest of the crate free of
/// platform types and allows mock implementations in tests.
#[cfg_attr(test, mockall::automock(type Token = FakeToken; type Stream = FakeStream;))]
pub trait SpeechBackend {
    /// Handle to one installed voice.
    type Token;

    /// File-backed audio stream the engine renders into.
    type Stream;

    /// Enumerate every token in the voices category.
    fn voice_tokens(&self) -> Result<Vec<Self::Token>, BackendError>;

    /// Human-readable description of a voice, used as its name.
    fn describe(&self, token: &Self::Token) -> Result<String, BackendError>;

    /// Bind a voice to the engine session.
    fn set_voice(&self, token: &Self::Token) -> Result<(), BackendError>;

    /// Create (or truncate) `path` as an audio stream in `format`.
    fn create_wav_stream(
        &self,
        path: &Path,
        format: &WaveFormat,
    ) -> Result<Self::Stream, BackendError>;

    /// Route engine output to `stream`.
    fn set_output(&self, stream: &Self::Stream) -> Result<(), BackendError>;

    /// Speak `text` with markup interpretation enabled.
    ///
    /// Blocks until the engine has finished writing to the current output.
    fn speak_markup(&self, text: &str) -> Result<(), BackendError>;

    /// Close `stream`, flushing all audio data to disk.
    fn close_stream(&self, stream: Self::Stream) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::testing::ReleaseCounter;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_backend_tokens_release_on_drop() {
        let releases = ReleaseCounter::new();
        let counter = releases.clone();
        let mut mock = MockSpeechBackend::new();

        mock.expect_voice_tokens().times(1).returning(move || {
            Ok(vec![
                FakeToken::new("a", &counter),
                FakeToken::new("b", &counter),
            ])
        });

        let tokens = mock.voice_tokens().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(releases.count(), 0);

        drop(tokens);
        assert_eq!(releases.count(), 2);
    }

    #[test]
    fn test_mock_backend_describe_failure() {
        let releases = ReleaseCounter::new();
        let mut mock = MockSpeechBackend::new();

        mock.expect_describe()
            .times(1)
            .returning(|_| Err(BackendError::Description("no default value".to_string())));

        let token = FakeToken::new("broken", &releases);
        let result = mock.describe(&token);

        assert!(matches!(result.unwrap_err(), BackendError::Description(_)));
    }

    #[test]
    fn test_fake_stream_writes_requested_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.wav");
        let format = WaveFormat::stereo_48khz_16bit().unwrap();
        let mut mock = MockSpeechBackend::new();

        mock.expect_create_wav_stream()
            .times(1)
            .returning(|path, format| FakeStream::create(path, format));
        mock.expect_close_stream()
            .times(1)
            .returning(|stream| stream.finalize());

        let stream = mock.create_wav_stream(&path, &format).unwrap();
        mock.close_stream(stream).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec(), format.spec());
        assert_eq!(reader.duration(), 0);
    }
}
