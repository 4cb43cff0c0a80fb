#![forbid(unsafe_code)]

//! Width helpers and break-opportunity tokenization.
//!
//! Widths are in cells and respect grapheme cluster boundaries: an emoji
//! or ZWJ sequence is never split. Tokenization decides where lines may
//! break:
//! - between a word and a whitespace run,
//! - around any double-width grapheme (CJK text has no spaces),
//! - at hard newlines.
//!
//! # Example
//! ```
//! use foldtext_text::wrap::{display_width, grapheme_width};
//!
//! assert_eq!(display_width("中文"), 4);
//! assert_eq!(grapheme_width("e\u{301}"), 1);
//! ```

use foldtext_render::Style;
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Calculate the display width of text in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Width of a single grapheme, never less than one cell for visible text.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    match grapheme.width() {
        0 if !grapheme.chars().all(char::is_control) => 1,
        w => w,
    }
}

#[inline]
fn is_whitespace(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

#[inline]
fn is_newline(grapheme: &str) -> bool {
    matches!(grapheme, "\n" | "\r\n" | "\r")
}

/// One grapheme with its style and cell width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph<'a> {
    pub text: &'a str,
    pub style: Option<Style>,
    pub cells: usize,
}

/// Unit of line breaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Graphemes that stay together unless the word is wider than a line.
    Word(SmallVec<[Glyph<'a>; 8]>),
    /// A whitespace run; dropped at soft line starts.
    Space(SmallVec<[Glyph<'a>; 2]>),
    /// Hard line break.
    Break,
}

impl Token<'_> {
    pub fn cells(&self) -> usize {
        match self {
            Token::Word(glyphs) => glyphs.iter().map(|g| g.cells).sum(),
            Token::Space(glyphs) => glyphs.iter().map(|g| g.cells).sum(),
            Token::Break => 0,
        }
    }
}

/// Split styled runs into break tokens.
///
/// Words may span run boundaries, so a style change in the middle of a
/// word does not introduce a break opportunity.
pub(crate) fn tokenize<'a>(runs: &[(&'a str, Option<Style>)]) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut word: SmallVec<[Glyph<'a>; 8]> = SmallVec::new();
    let mut space: SmallVec<[Glyph<'a>; 2]> = SmallVec::new();

    fn flush<'a>(
        tokens: &mut Vec<Token<'a>>,
        word: &mut SmallVec<[Glyph<'a>; 8]>,
        space: &mut SmallVec<[Glyph<'a>; 2]>,
    ) {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
        if !space.is_empty() {
            tokens.push(Token::Space(std::mem::take(space)));
        }
    }

    for &(text, style) in runs {
        for grapheme in text.graphemes(true) {
            if is_newline(grapheme) {
                flush(&mut tokens, &mut word, &mut space);
                tokens.push(Token::Break);
                continue;
            }

            let glyph = Glyph {
                text: grapheme,
                style,
                cells: grapheme_width(grapheme),
            };

            if is_whitespace(grapheme) {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                space.push(glyph);
            } else if glyph.cells > 1 {
                flush(&mut tokens, &mut word, &mut space);
                tokens.push(Token::Word(SmallVec::from_elem(glyph, 1)));
            } else {
                if !space.is_empty() {
                    tokens.push(Token::Space(std::mem::take(&mut space)));
                }
                word.push(glyph);
            }
        }
    }
    flush(&mut tokens, &mut word, &mut space);

    tokens
}
