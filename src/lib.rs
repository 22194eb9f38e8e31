//! speak: render a UTF-8 text file to a WAV file with an installed system voice.
//!
//! This crate lists the text-to-speech voices provided by the operating
//! system (SAPI 5 on Windows) and speaks a text file, markup included, into
//! a 48 kHz 16-bit stereo WAV file with the voice chosen by name.

pub mod backend;
pub mod cli;
pub mod engine;
pub mod voice;
