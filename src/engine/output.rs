//! Read-back of a finished WAV file.

use std::path::Path;

/// Header facts of a written WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSummary {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Sample frames (samples per channel).
    pub frames: u32,
}

impl OutputSummary {
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.frames) / f64::from(self.sample_rate)
    }
}

/// Open `path` as a WAV file and summarize its header.
pub fn inspect_output(path: &Path) -> Result<OutputSummary, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    Ok(OutputSummary {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames: reader.duration(),
    })
}
