//! CLI argument definitions and parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Render a UTF-8 text file to a WAV file with an installed system voice.
#[derive(Parser, Debug)]
#[command(name = "speak")]
#[command(about = "Render a UTF-8 text file to a WAV file with an installed system voice")]
#[command(version)]
pub struct Args {
    /// List the installed voices and exit
    #[arg(long, conflicts_with_all = ["voice", "text_file", "wav_file"])]
    pub list_voices: bool,

    /// Voice name, exactly as printed by --list-voices
    pub voice: Option<String>,

    /// UTF-8 text file to speak; may contain speech markup
    pub text_file: Option<PathBuf>,

    /// WAV file to write (replaced if it exists)
    pub wav_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    ListVoices,
    Synthesize(SynthesisRequest),
}

/// One text file to render with one voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub voice: String,
    pub text_file: PathBuf,
    pub wav_file: PathBuf,
}

/// Errors that can occur when interpreting the command line.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error("Expected a voice name, a text file and a wav file, or --list-voices")]
    InvalidShape,
}

impl UsageError {
    /// Whether clap produced help or version text rather than a real error.
    pub fn is_informational(&self) -> bool {
        match self {
            UsageError::Clap(e) => matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ),
            UsageError::InvalidShape => false,
        }
    }
}

impl Args {
    /// Parse arguments from an iterator, the first item being the program name.
    pub fn try_from_iter<I, T>(itr: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(itr)?)
    }

    /// Resolve the parsed arguments into one of the two supported shapes.
    ///
    /// # Returns
    /// * `Ok(Invocation::ListVoices)` for `--list-voices` alone
    /// * `Ok(Invocation::Synthesize(_))` for exactly three positionals
    /// * `Err(UsageError::InvalidShape)` otherwise
    pub fn invocation(&self) -> Result<Invocation, UsageError> {
        if self.list_voices {
            return Ok(Invocation::ListVoices);
        }

        match (&self.voice, &self.text_file, &self.wav_file) {
            (Some(voice), Some(text_file), Some(wav_file)) => {
                Ok(Invocation::Synthesize(SynthesisRequest {
                    voice: voice.clone(),
                    text_file: text_file.clone(),
                    wav_file: wav_file.clone(),
                }))
            }
            _ => Err(UsageError::InvalidShape),
        }
    }
}

/// What `main` should do with the command line.
#[derive(Debug)]
pub enum CommandLine {
    /// Carry out the invocation.
    Run { invocation: Invocation, verbose: bool },
    /// Print help or version text and exit successfully.
    Informational(String),
    /// Print the usage text and exit with failure.
    Usage(String),
}

/// Interpret a full argument vector, the first item being the program name.
///
/// The program name is converted lossily, so a non-Unicode `argv[0]` still
/// yields usable usage text.
pub fn parse_command_line<I, T>(itr: I) -> CommandLine
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = itr.into_iter().map(Into::into).collect();
    let program = argv
        .first()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "speak".to_string());

    let parsed = Args::try_from_iter(argv.iter().cloned())
        .and_then(|args| args.invocation().map(|invocation| (invocation, args.verbose)));

    match parsed {
        Ok((invocation, verbose)) => CommandLine::Run {
            invocation,
            verbose,
        },
        Err(e) if e.is_informational() => CommandLine::Informational(e.to_string()),
        Err(_) => CommandLine::Usage(usage(&program)),
    }
}

/// Two-line usage text covering both invocation forms.
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <voice name> <text file> <wav file>\n   or: {program} --list-voices"
    )
}
