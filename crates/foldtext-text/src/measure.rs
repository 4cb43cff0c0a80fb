#![forbid(unsafe_code)]

//! Text measurement capability.
//!
//! The fold engine never lays out glyphs itself; it asks a
//! [`TextMeasurer`] for heights and label sizes. [`TextLayouter`] extends
//! that with the full line layout needed to paint text.
//! [`MonospaceMeasurer`] implements both on a fixed cell grid, which is
//! exact for terminals and deterministic for tests.

use crate::flow::{TextLayout, flow};
use crate::font::Font;
use crate::text::Content;
use crate::wrap::display_width;
use foldtext_core::geometry::{LayoutRect, Size};
use smallvec::SmallVec;
use std::rc::Rc;

/// Default string appended to truncated text.
pub const DEFAULT_ELLIPSIS: &str = "…";

/// Constraints for one measurement: a width bound, no height bound.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConstraints {
    /// Maximum line width in layout units.
    pub max_width: f32,
    /// Maximum number of lines; 0 means unlimited.
    pub max_lines: usize,
    /// Regions text must flow around, relative to the layout origin.
    pub exclusions: SmallVec<[LayoutRect; 1]>,
    /// Base font for the content.
    pub font: Font,
    /// Appended to the last line when `max_lines` cuts the text.
    pub ellipsis: String,
}

impl LayoutConstraints {
    /// Unlimited lines and no exclusions.
    #[must_use]
    pub fn new(max_width: f32, font: Font) -> Self {
        Self {
            max_width,
            max_lines: 0,
            exclusions: SmallVec::new(),
            font,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }

    #[must_use]
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    #[must_use]
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = LayoutRect>) -> Self {
        self.exclusions = exclusions.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }
}

/// Measures content height and label sizes.
///
/// Implementations must be deterministic for fixed inputs.
pub trait TextMeasurer {
    /// Minimum height needed to lay out `content` under `constraints`.
    fn measure(&self, content: &Content, constraints: &LayoutConstraints) -> f32;

    /// Height of one line set in `font`.
    fn line_height(&self, font: &Font) -> f32;

    /// Natural single-line size of `label` in `font`.
    fn label_size(&self, label: &str, font: &Font) -> Size;
}

/// A measurer that can also produce the line layout it measured.
pub trait TextLayouter: TextMeasurer {
    fn layout(&self, content: &Content, constraints: &LayoutConstraints) -> TextLayout;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, content: &Content, constraints: &LayoutConstraints) -> f32 {
        (**self).measure(content, constraints)
    }

    fn line_height(&self, font: &Font) -> f32 {
        (**self).line_height(font)
    }

    fn label_size(&self, label: &str, font: &Font) -> Size {
        (**self).label_size(label, font)
    }
}

impl<T: TextLayouter + ?Sized> TextLayouter for &T {
    fn layout(&self, content: &Content, constraints: &LayoutConstraints) -> TextLayout {
        (**self).layout(content, constraints)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Rc<T> {
    fn measure(&self, content: &Content, constraints: &LayoutConstraints) -> f32 {
        (**self).measure(content, constraints)
    }

    fn line_height(&self, font: &Font) -> f32 {
        (**self).line_height(font)
    }

    fn label_size(&self, label: &str, font: &Font) -> Size {
        (**self).label_size(label, font)
    }
}

impl<T: TextLayouter + ?Sized> TextLayouter for Rc<T> {
    fn layout(&self, content: &Content, constraints: &LayoutConstraints) -> TextLayout {
        (**self).layout(content, constraints)
    }
}

/// Measurer for monospace cell grids.
///
/// Every grapheme advances by its cell width times the font's advance;
/// lines break at whitespace, around double-width graphemes, and inside
/// words wider than a whole line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl MonospaceMeasurer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, content: &Content, constraints: &LayoutConstraints) -> f32 {
        flow(content, constraints).height
    }

    fn line_height(&self, font: &Font) -> f32 {
        font.line_height
    }

    fn label_size(&self, label: &str, font: &Font) -> Size {
        if label.is_empty() {
            return Size::ZERO;
        }
        Size::new(display_width(label) as f32 * font.advance, font.line_height)
    }
}

impl TextLayouter for MonospaceMeasurer {
    fn layout(&self, content: &Content, constraints: &LayoutConstraints) -> TextLayout {
        flow(content, constraints)
    }
}
