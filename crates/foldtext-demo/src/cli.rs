#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually. Environment variables with the `FOLDTEXT_DEMO_`
//! prefix supply defaults that explicit flags override.

use std::env;
use std::fmt;
use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
foldtext demo: collapsible text in the terminal

USAGE:
    foldtext-demo [OPTIONS]

OPTIONS:
    --width=N          Widget width in columns (default: terminal width minus margins)
    --lines=N          Lines shown while folded, 0 disables folding (default: 3)
    --text=STR         Text to display (default: built-in sample)
    --file=PATH        Read the text to display from PATH
    --once             Print the folded and unfolded renderings and exit
    --log-file=PATH    Write logs to PATH
    --help, -h         Show this help message
    --version, -V      Show version

KEYBINDINGS:
    Space / Enter / m  Toggle fold
    Mouse click        Toggle when clicking the more/less label
    + / -              Change the line cap
    q / Esc / Ctrl+C   Quit

ENVIRONMENT VARIABLES:
    FOLDTEXT_DEMO_WIDTH       Override --width
    FOLDTEXT_DEMO_LINES       Override --lines
    FOLDTEXT_DEMO_TEXT        Override --text
    FOLDTEXT_DEMO_FILE        Override --file
    FOLDTEXT_DEMO_ONCE        Set to 1 for --once
    FOLDTEXT_LOG              Log filter (e.g. debug, foldtext_widgets=trace)
    FOLDTEXT_LOG_FORMAT       text (default) or json";

/// Where the displayed text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextSource {
    #[default]
    Sample,
    Inline(String),
    File(PathBuf),
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Opts {
    /// Fixed widget width in columns.
    pub width: Option<u16>,
    /// Folded line cap; `None` keeps the configured default.
    pub lines: Option<usize>,
    pub source: TextSource,
    /// Print renderings instead of running interactively.
    pub once: bool,
    pub log_file: Option<PathBuf>,
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Rejected argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    InvalidValue { flag: &'static str, value: String },
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Command, CliError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name) with environment lookups
    /// through `get_env`.
    pub fn parse_from<I, F>(args: I, mut get_env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = String>,
        F: FnMut(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("FOLDTEXT_DEMO_WIDTH")
            && let Some(n) = parse_width(&val)
        {
            opts.width = Some(n);
        }
        if let Some(val) = get_env("FOLDTEXT_DEMO_LINES")
            && let Ok(n) = val.trim().parse()
        {
            opts.lines = Some(n);
        }
        if let Some(val) = get_env("FOLDTEXT_DEMO_TEXT") {
            opts.source = TextSource::Inline(val);
        }
        if let Some(val) = get_env("FOLDTEXT_DEMO_FILE") {
            opts.source = TextSource::File(PathBuf::from(val));
        }
        if let Some(val) = get_env("FOLDTEXT_DEMO_ONCE") {
            opts.once = matches!(val.trim(), "1" | "true" | "yes");
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--once" => opts.once = true,
                other => {
                    if let Some(val) = other.strip_prefix("--width=") {
                        opts.width = Some(parse_width(val).ok_or_else(|| {
                            CliError::InvalidValue {
                                flag: "--width",
                                value: val.to_string(),
                            }
                        })?);
                    } else if let Some(val) = other.strip_prefix("--lines=") {
                        let n = val.trim().parse().map_err(|_| CliError::InvalidValue {
                            flag: "--lines",
                            value: val.to_string(),
                        })?;
                        opts.lines = Some(n);
                    } else if let Some(val) = other.strip_prefix("--text=") {
                        opts.source = TextSource::Inline(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--file=") {
                        opts.source = TextSource::File(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn parse_width(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|n| *n > 0)
}
