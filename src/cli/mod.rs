//! CLI argument parsing and dispatch.

mod args;
pub mod dispatch;

pub use args::{
    Args, CommandLine, Invocation, SynthesisRequest, UsageError, parse_command_line, usage,
};
pub use dispatch::{DispatchError, VOICES_BANNER, run};
