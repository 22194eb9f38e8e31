//! Synthesis orchestration.
//!
//! This module drives the backend through the stages that turn a text file
//! into a WAV file, and reads the finished file back for reporting.

mod output;
mod pipeline;

pub use output::{OutputSummary, inspect_output};
pub use pipeline::{SynthesisError, SynthesisPipeline, read_text};
