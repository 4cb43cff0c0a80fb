#![forbid(unsafe_code)]

//! Errors that end the demo.

use std::fmt;
use std::io;
use std::path::PathBuf;

use foldtext_core::logging::LoggingError;
use foldtext_widgets::config::ConfigError;

use crate::cli::CliError;

#[derive(Debug)]
pub enum DemoError {
    Cli(CliError),
    Config(ConfigError),
    Logging(LoggingError),
    ReadText { path: PathBuf, source: io::Error },
    Io(io::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Logging(err) => write!(f, "logging: {err}"),
            Self::ReadText { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Io(err) => write!(f, "terminal: {err}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Cli(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::ReadText { source, .. } => Some(source),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<CliError> for DemoError {
    fn from(err: CliError) -> Self {
        Self::Cli(err)
    }
}

impl From<ConfigError> for DemoError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<LoggingError> for DemoError {
    fn from(err: LoggingError) -> Self {
        Self::Logging(err)
    }
}

impl From<io::Error> for DemoError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
