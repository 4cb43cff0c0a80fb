#![forbid(unsafe_code)]

//! Fold widget configuration.
//!
//! Defaults mirror a 13pt system font with a blue "more"/"less" affordance
//! and a three-line cap. Environment overrides:
//!
//! | variable | field |
//! |----------|-------|
//! | `FOLDTEXT_LINE_CAP` | [`FoldConfig::line_cap`] |
//! | `FOLDTEXT_FONT_SIZE` | both fonts, as `Font::system(size)` |
//! | `FOLDTEXT_MORE_LABEL` | [`AffordanceLabels::more`] |
//! | `FOLDTEXT_LESS_LABEL` | [`AffordanceLabels::less`] |
//!
//! Invalid values are ignored and logged at warn level.

use foldtext_render::cell::PackedRgba;
use foldtext_render::style::Style;
use foldtext_text::{DEFAULT_ELLIPSIS, Font};
use std::env;
use std::fmt;

pub const ENV_LINE_CAP: &str = "FOLDTEXT_LINE_CAP";
pub const ENV_FONT_SIZE: &str = "FOLDTEXT_FONT_SIZE";
pub const ENV_MORE_LABEL: &str = "FOLDTEXT_MORE_LABEL";
pub const ENV_LESS_LABEL: &str = "FOLDTEXT_LESS_LABEL";

/// Default number of lines shown while folded.
pub const DEFAULT_LINE_CAP: usize = 3;
/// Default point size of the text and affordance fonts.
pub const DEFAULT_FONT_SIZE: f32 = 13.0;

/// Labels of the toggle affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffordanceLabels {
    /// Shown while folded.
    pub more: String,
    /// Shown while unfolded. Also reserved at the end of the content when
    /// sizing the unfolded state.
    pub less: String,
}

impl AffordanceLabels {
    pub fn new(more: impl Into<String>, less: impl Into<String>) -> Self {
        Self {
            more: more.into(),
            less: less.into(),
        }
    }

    /// Label for the given selection state.
    pub fn for_selected(&self, selected: bool) -> &str {
        if selected { &self.less } else { &self.more }
    }
}

impl Default for AffordanceLabels {
    fn default() -> Self {
        Self::new("more", "less")
    }
}

/// Configuration of a fold engine and its widget.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldConfig {
    /// Lines shown while folded; 0 disables folding.
    pub line_cap: usize,
    pub text_font: Font,
    pub affordance_font: Font,
    pub labels: AffordanceLabels,
    /// Base style of the content. Span styles are patched over it.
    pub text_style: Style,
    pub affordance_style: Style,
    /// Appended to the last visible line when the cap cuts the content.
    pub ellipsis: String,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            line_cap: DEFAULT_LINE_CAP,
            text_font: Font::system(DEFAULT_FONT_SIZE),
            affordance_font: Font::system(DEFAULT_FONT_SIZE),
            labels: AffordanceLabels::default(),
            text_style: Style::new(),
            affordance_style: Style::new().fg(PackedRgba::BLUE),
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }
}

impl FoldConfig {
    /// Defaults laid out on a terminal cell grid.
    #[must_use]
    pub fn terminal() -> Self {
        Self::default().font(Font::terminal())
    }

    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Defaults with overrides read through `get_env`.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self::default().with_env_overrides(get_env)
    }

    /// Apply overrides read through `get_env`, logging and skipping
    /// invalid values.
    #[must_use]
    pub fn with_env_overrides<F>(self, get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let (config, errors) = self.with_env_diagnostics(get_env);
        for error in &errors {
            tracing::warn!(%error, "ignoring fold configuration override");
        }
        config
    }

    /// Apply overrides read through `get_env` and return every rejected
    /// value.
    pub fn with_env_diagnostics<F>(mut self, mut get_env: F) -> (Self, Vec<ConfigError>)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        if let Some(value) = get_env(ENV_LINE_CAP) {
            match parse_line_cap(&value) {
                Ok(cap) => self.line_cap = cap,
                Err(err) => errors.push(err),
            }
        }

        if let Some(value) = get_env(ENV_FONT_SIZE) {
            match parse_font_size(&value) {
                Ok(size) => {
                    self.text_font = Font::system(size);
                    self.affordance_font = Font::system(size);
                }
                Err(err) => errors.push(err),
            }
        }

        if let Some(value) = get_env(ENV_MORE_LABEL) {
            if value.is_empty() {
                errors.push(ConfigError::EmptyLabel { which: "more" });
            } else {
                self.labels.more = value;
            }
        }

        if let Some(value) = get_env(ENV_LESS_LABEL) {
            if value.is_empty() {
                errors.push(ConfigError::EmptyLabel { which: "less" });
            } else {
                self.labels.less = value;
            }
        }

        (self, errors)
    }

    #[must_use]
    pub fn line_cap(mut self, line_cap: usize) -> Self {
        self.line_cap = line_cap;
        self
    }

    /// Use `font` for both the text and the affordance.
    #[must_use]
    pub fn font(mut self, font: Font) -> Self {
        self.text_font = font;
        self.affordance_font = font;
        self
    }

    #[must_use]
    pub fn text_font(mut self, font: Font) -> Self {
        self.text_font = font;
        self
    }

    #[must_use]
    pub fn affordance_font(mut self, font: Font) -> Self {
        self.affordance_font = font;
        self
    }

    #[must_use]
    pub fn labels(mut self, more: impl Into<String>, less: impl Into<String>) -> Self {
        self.labels = AffordanceLabels::new(more, less);
        self
    }

    #[must_use]
    pub fn text_style(mut self, style: Style) -> Self {
        self.text_style = style;
        self
    }

    #[must_use]
    pub fn affordance_style(mut self, style: Style) -> Self {
        self.affordance_style = style;
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    /// Check that fonts can lay out text and both labels are non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.text_font.is_usable() {
            return Err(ConfigError::UnusableFont { which: "text" });
        }
        if !self.affordance_font.is_usable() {
            return Err(ConfigError::UnusableFont {
                which: "affordance",
            });
        }
        if self.labels.more.is_empty() {
            return Err(ConfigError::EmptyLabel { which: "more" });
        }
        if self.labels.less.is_empty() {
            return Err(ConfigError::EmptyLabel { which: "less" });
        }
        Ok(())
    }
}

/// Parse a line cap: a non-negative integer, 0 meaning unlimited.
pub fn parse_line_cap(value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidLineCap {
            value: value.to_string(),
        })
}

/// Parse a point size: a finite number greater than zero.
pub fn parse_font_size(value: &str) -> Result<f32, ConfigError> {
    match value.trim().parse::<f32>() {
        Ok(size) if size.is_finite() && size > 0.0 => Ok(size),
        _ => Err(ConfigError::InvalidFontSize {
            value: value.to_string(),
        }),
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLineCap { value: String },
    InvalidFontSize { value: String },
    UnusableFont { which: &'static str },
    EmptyLabel { which: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLineCap { value } => {
                write!(f, "invalid line cap {value:?}: expected a non-negative integer")
            }
            Self::InvalidFontSize { value } => {
                write!(f, "invalid font size {value:?}: expected a positive number")
            }
            Self::UnusableFont { which } => {
                write!(f, "{which} font has a non-positive line height or advance")
            }
            Self::EmptyLabel { which } => write!(f, "the {which} label is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
