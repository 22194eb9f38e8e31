//! Voice discovery and lookup.
//!
//! This module builds the registry of installed voices that the CLI lists
//! and that synthesis looks voices up in.

mod registry;

pub use registry::VoiceRegistry;
