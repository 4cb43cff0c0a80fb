#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! Library code logs through `tracing` macros directly. This module owns the
//! subscriber side: reading the filter and output format from the
//! environment and installing a `tracing-subscriber` fmt layer (feature
//! `subscriber`). Interactive shells should log to a file so the terminal is
//! not corrupted.

use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the `EnvFilter` directive (e.g. `foldtext_widgets=debug`).
pub const ENV_LOG: &str = "FOLDTEXT_LOG";
/// Environment variable selecting the output format (`text` or `json`).
pub const ENV_LOG_FORMAT: &str = "FOLDTEXT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "warn";

/// Output format for installed subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// Newline-delimited JSON records.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" | "pretty" => Some(Self::Text),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogSink {
    #[default]
    Stderr,
    /// Append to a file, created if missing.
    File(PathBuf),
}

/// Subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    pub format: LogFormat,
    pub sink: LogSink,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            sink: LogSink::default(),
        }
    }
}

impl LogConfig {
    /// Read `FOLDTEXT_LOG` and `FOLDTEXT_LOG_FORMAT` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build a config using a custom environment lookup (for tests).
    ///
    /// Unknown formats fall back to [`LogFormat::Text`].
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(filter) = get_env(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = get_env(ENV_LOG_FORMAT).as_deref().and_then(LogFormat::parse) {
            config.format = format;
        }
        config
    }

    /// Set the output sink.
    #[must_use]
    pub fn sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// True when no filter override was supplied.
    #[must_use]
    pub fn is_default_filter(&self) -> bool {
        self.filter == DEFAULT_FILTER
    }
}

/// Failures while installing a subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// A global subscriber is already set.
    AlreadyInstalled,
    /// The filter directive did not parse.
    InvalidFilter { filter: String, reason: String },
    /// The log file could not be opened.
    Sink { path: PathBuf, source: std::io::Error },
    /// JSON output was requested but the `json` feature is off.
    JsonUnavailable,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalled => write!(f, "a global tracing subscriber is already installed"),
            Self::InvalidFilter { filter, reason } => {
                write!(f, "invalid log filter {filter:?}: {reason}")
            }
            Self::Sink { path, source } => {
                write!(f, "cannot open log file {}: {source}", path.display())
            }
            Self::JsonUnavailable => write!(f, "json log output requires the `json` feature"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sink { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Install a global fmt subscriber described by `config`.
#[cfg(feature = "subscriber")]
pub fn install(config: &LogConfig) -> Result<(), LoggingError> {
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.filter).map_err(|err| LoggingError::InvalidFilter {
        filter: config.filter.clone(),
        reason: err.to_string(),
    })?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match (config.format, &config.sink) {
        (LogFormat::Text, LogSink::Stderr) => builder.with_writer(std::io::stderr).try_init(),
        (LogFormat::Text, LogSink::File(path)) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_sink(path)?))
            .try_init(),
        #[cfg(feature = "json")]
        (LogFormat::Json, LogSink::Stderr) => {
            builder.json().with_writer(std::io::stderr).try_init()
        }
        #[cfg(feature = "json")]
        (LogFormat::Json, LogSink::File(path)) => builder
            .json()
            .with_writer(Mutex::new(open_sink(path)?))
            .try_init(),
        #[cfg(not(feature = "json"))]
        (LogFormat::Json, _) => return Err(LoggingError::JsonUnavailable),
    };
    result.map_err(|_| LoggingError::AlreadyInstalled)?;
    tracing::debug!(
        filter = %config.filter,
        format = config.format.as_str(),
        "log subscriber installed"
    );
    Ok(())
}

#[cfg(feature = "subscriber")]
fn open_sink(path: &std::path::Path) -> Result<std::fs::File, LoggingError> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Sink {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_without_env() {
        let config = LogConfig::from_env_with(env(&[]));
        assert_eq!(config, LogConfig::default());
        assert!(config.is_default_filter());
    }

    #[test]
    fn reads_filter_and_format() {
        let config = LogConfig::from_env_with(env(&[
            (ENV_LOG, "foldtext_widgets=debug"),
            (ENV_LOG_FORMAT, "JSON"),
        ]));
        assert_eq!(config.filter, "foldtext_widgets=debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.is_default_filter());
    }

    #[test]
    fn blank_filter_and_unknown_format_are_ignored() {
        let config = LogConfig::from_env_with(env(&[(ENV_LOG, "  "), (ENV_LOG_FORMAT, "xml")]));
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn sink_builder() {
        let config = LogConfig::default().sink(LogSink::File(PathBuf::from("/tmp/foldtext.log")));
        assert_eq!(config.sink, LogSink::File(PathBuf::from("/tmp/foldtext.log")));
    }

    #[test]
    fn error_messages() {
        let err = LoggingError::InvalidFilter {
            filter: "[".into(),
            reason: "bad".into(),
        };
        assert!(err.to_string().contains("invalid log filter"));
        assert_eq!(
            LoggingError::AlreadyInstalled.to_string(),
            "a global tracing subscriber is already installed"
        );
    }

    #[cfg(feature = "subscriber")]
    #[test]
    fn invalid_filter_is_reported() {
        let config = LogConfig {
            filter: "foo=notalevel".into(),
            ..LogConfig::default()
        };
        assert!(matches!(
            install(&config),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }
}
