#![forbid(unsafe_code)]

//! Text content: plain strings or styled span sequences.
//!
//! # Example
//! ```
//! use foldtext_text::{Content, Span, StyledText};
//! use foldtext_render::Style;
//!
//! let plain = Content::plain("hello");
//! assert_eq!(plain.to_plain_text(), "hello");
//!
//! let styled = StyledText::from_spans([
//!     Span::raw("Status: "),
//!     Span::styled("OK", Style::new().bold()),
//! ]);
//! assert_eq!(Content::from(styled).to_plain_text(), "Status: OK");
//! ```

use crate::wrap::display_width;
use foldtext_render::Style;
use std::borrow::Cow;

/// A run of text with an optional style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub content: String,
    pub style: Option<Style>,
}

impl Span {
    /// Create an unstyled span.
    #[must_use]
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: None,
        }
    }

    /// Create a styled span.
    #[must_use]
    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Self {
            content: content.into(),
            style: Some(style),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Display width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        display_width(&self.content)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<&str> for Span {
    fn from(s: &str) -> Self {
        Self::raw(s)
    }
}

impl From<String> for Span {
    fn from(s: String) -> Self {
        Self::raw(s)
    }
}

/// Styled (attributed) text: an ordered sequence of spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    #[must_use]
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        Self {
            spans: spans.into_iter().collect(),
        }
    }

    pub fn push(&mut self, span: impl Into<Span>) {
        self.spans.push(span.into());
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_span(mut self, span: impl Into<Span>) -> Self {
        self.push(span);
        self
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// True when there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(Span::is_empty)
    }

    pub fn to_plain_text(&self) -> String {
        self.spans.iter().map(Span::as_str).collect()
    }
}

/// Content displayed by the widget.
///
/// Plain and styled content are mutually exclusive; setting one replaces
/// the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    #[default]
    Empty,
    Plain(String),
    Styled(StyledText),
}

impl Content {
    /// Plain content; an empty string yields [`Content::Empty`].
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Plain(text)
        }
    }

    /// Styled content; text with no characters yields [`Content::Empty`].
    #[must_use]
    pub fn styled(text: StyledText) -> Self {
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Styled(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Plain(text) => text.is_empty(),
            Self::Styled(text) => text.is_empty(),
        }
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, Self::Styled(_))
    }

    pub fn to_plain_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Plain(text) => Cow::Borrowed(text),
            Self::Styled(text) => Cow::Owned(text.to_plain_text()),
        }
    }

    /// Text runs in order, with their styles.
    pub fn runs(&self) -> Vec<(&str, Option<Style>)> {
        match self {
            Self::Empty => Vec::new(),
            Self::Plain(text) => vec![(text.as_str(), None)],
            Self::Styled(text) => text
                .spans()
                .iter()
                .map(|span| (span.as_str(), span.style))
                .collect(),
        }
    }

    /// A copy with `suffix` appended, keeping the content's kind.
    ///
    /// Plain content stays plain (the style is dropped); empty content
    /// becomes plain.
    #[must_use]
    pub fn with_appended(&self, suffix: &str, style: Option<Style>) -> Content {
        match self {
            Self::Empty => Content::plain(suffix),
            Self::Plain(text) => Content::Plain(format!("{text}{suffix}")),
            Self::Styled(text) => {
                let span = Span {
                    content: suffix.to_string(),
                    style,
                };
                Content::Styled(text.clone().with_span(span))
            }
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::plain(s)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::plain(s)
    }
}

impl From<StyledText> for Content {
    fn from(text: StyledText) -> Self {
        Self::styled(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_empty_content() {
        assert_eq!(Content::plain(""), Content::Empty);
        assert!(Content::default().is_empty());
        assert_eq!(Content::styled(StyledText::from_spans([Span::raw("")])), Content::Empty);
    }

    #[test]
    fn runs_carry_styles() {
        let bold = Style::new().bold();
        let content = Content::from(StyledText::from_spans([
            Span::raw("a"),
            Span::styled("b", bold),
        ]));
        assert_eq!(content.runs(), vec![("a", None), ("b", Some(bold))]);
        assert!(content.is_styled());
    }

    #[test]
    fn append_keeps_plain_kind() {
        let content = Content::plain("text");
        let appended = content.with_appended("less", Some(Style::new().bold()));
        assert_eq!(appended, Content::Plain("textless".into()));
        assert_eq!(content, Content::Plain("text".into()));
    }

    #[test]
    fn append_to_styled_adds_span() {
        let style = Style::new().dim();
        let content = Content::from(StyledText::new().with_span("x"));
        let appended = content.with_appended("less", Some(style));
        match appended {
            Content::Styled(text) => {
                assert_eq!(text.spans().len(), 2);
                assert_eq!(text.spans()[1], Span::styled("less", style));
            }
            other => panic!("expected styled content, got {other:?}"),
        }
    }

    #[test]
    fn append_to_empty_is_plain() {
        assert_eq!(
            Content::Empty.with_appended("less", None),
            Content::Plain("less".into())
        );
    }

    #[test]
    fn span_width_counts_cells() {
        assert_eq!(Span::raw("ab中").width(), 4);
    }
}
