//! Backend error and audio format types.

use thiserror::Error;

/// `wFormatTag` value for uncompressed PCM.
pub const WAVE_FORMAT_PCM: u16 = 1;

/// Errors reported by the platform speech service.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Speech subsystem unavailable: {0}")]
    Unavailable(String),

    #[error("Platform call failed: {0}")]
    Platform(String),

    #[error("Voice description unavailable: {0}")]
    Description(String),
}

/// Errors that can occur when building a wave format descriptor.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("Channel count cannot be zero")]
    ZeroChannels,

    #[error("Sample rate cannot be zero")]
    ZeroSampleRate,

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("Format exceeds the descriptor limits")]
    Overflow,
}

/// PCM format descriptor handed to the engine when binding an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    block_align: u16,
    avg_bytes_per_sec: u32,
}

impl WaveFormat {
    /// Build an uncompressed PCM descriptor.
    ///
    /// Block alignment and byte rate are derived here so that an accepted
    /// format always fits the fixed-width header fields.
    pub fn pcm(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Result<Self, FormatError> {
        if channels == 0 {
            return Err(FormatError::ZeroChannels);
        }
        if sample_rate == 0 {
            return Err(FormatError::ZeroSampleRate);
        }
        if !matches!(bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(FormatError::UnsupportedBitDepth(bits_per_sample));
        }

        let block_align = channels
            .checked_mul(bits_per_sample / 8)
            .ok_or(FormatError::Overflow)?;
        let avg_bytes_per_sec = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or(FormatError::Overflow)?;

        Ok(Self {
            channels,
            sample_rate,
            bits_per_sample,
            block_align,
            avg_bytes_per_sec,
        })
    }

    /// The format every synthesized file is written in: 48 kHz, 16-bit, stereo.
    pub fn stereo_48khz_16bit() -> Result<Self, FormatError> {
        Self::pcm(48_000, 16, 2)
    }

    /// `wFormatTag` of the descriptor; always PCM.
    pub fn format_tag(&self) -> u16 {
        WAVE_FORMAT_PCM
    }

    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.block_align
    }

    /// Bytes written per second of audio.
    pub fn avg_bytes_per_sec(&self) -> u32 {
        self.avg_bytes_per_sec
    }

    /// The equivalent `hound` spec, for writing or checking WAV headers.
    pub fn spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_messages() {
        let cases = [
            BackendError::Unavailable("no COM".to_string()),
            BackendError::Platform("E_FAIL".to_string()),
            BackendError::Description("token-3".to_string()),
        ];

        for err in cases {
            let expected = match &err {
                BackendError::Unavailable(m) => format!("Speech subsystem unavailable: {m}"),
                BackendError::Platform(m) => format!("Platform call failed: {m}"),
                BackendError::Description(m) => format!("Voice description unavailable: {m}"),
            };
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_output_format_fields() {
        let format = WaveFormat::stereo_48khz_16bit().unwrap();

        assert_eq!(format.format_tag(), WAVE_FORMAT_PCM);
        assert_eq!(format.channels, 2);
        assert_eq!(format.sample_rate, 48_000);
        assert_eq!(format.bits_per_sample, 16);
        assert_eq!(format.block_align(), 4);
        assert_eq!(format.avg_bytes_per_sec(), 192_000);
    }

    #[test]
    fn test_format_rejects_zero_channels() {
        assert_eq!(WaveFormat::pcm(48_000, 16, 0), Err(FormatError::ZeroChannels));
    }

    #[test]
    fn test_format_rejects_zero_sample_rate() {
        assert_eq!(WaveFormat::pcm(0, 16, 2), Err(FormatError::ZeroSampleRate));
    }

    #[test]
    fn test_format_rejects_odd_bit_depth() {
        assert_eq!(
            WaveFormat::pcm(48_000, 12, 2),
            Err(FormatError::UnsupportedBitDepth(12))
        );
    }

    #[test]
    fn test_format_rejects_overflowing_byte_rate() {
        assert_eq!(
            WaveFormat::pcm(u32::MAX, 32, 2),
            Err(FormatError::Overflow)
        );
    }

    #[test]
    fn test_format_spec_matches_descriptor() {
        let spec = WaveFormat::pcm(22_050, 8, 1).unwrap().spec();

        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(spec.bits_per_sample, 8);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    }
}
