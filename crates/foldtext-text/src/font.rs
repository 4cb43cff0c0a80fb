#![forbid(unsafe_code)]

//! Font metrics consumed by measurement.

use foldtext_core::geometry::Size;

/// Line height of the platform UI font as a multiple of its point size.
const SYSTEM_LINE_HEIGHT_RATIO: f32 = 1.193_359_4;
/// Average advance of a single-cell glyph as a multiple of point size.
const SYSTEM_ADVANCE_RATIO: f32 = 0.6;

/// Monospace font metrics in layout units.
///
/// A font is the size of one terminal cell: every single-width grapheme
/// advances by `advance`, double-width graphemes by twice that, and each
/// line is `line_height` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Nominal point size.
    pub size: f32,
    /// Height of one laid-out line.
    pub line_height: f32,
    /// Horizontal advance of one cell.
    pub advance: f32,
}

impl Font {
    /// Metrics approximating the platform UI font at `size` points.
    #[must_use]
    pub fn system(size: f32) -> Self {
        Self {
            size,
            line_height: size * SYSTEM_LINE_HEIGHT_RATIO,
            advance: size * SYSTEM_ADVANCE_RATIO,
        }
    }

    /// One layout unit per cell in both directions.
    #[must_use]
    pub const fn terminal() -> Self {
        Self {
            size: 1.0,
            line_height: 1.0,
            advance: 1.0,
        }
    }

    /// Explicit metrics.
    #[must_use]
    pub const fn new(size: f32, line_height: f32, advance: f32) -> Self {
        Self {
            size,
            line_height,
            advance,
        }
    }

    /// Line height rounded up to a whole layout unit.
    #[inline]
    pub fn ceil_line_height(&self) -> f32 {
        self.line_height.ceil()
    }

    /// Size of one cell.
    #[inline]
    pub const fn cell_size(&self) -> Size {
        Size::new(self.advance, self.line_height)
    }

    /// Whether the metrics can lay out text at all.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.line_height.is_finite()
            && self.advance.is_finite()
            && self.line_height > 0.0
            && self.advance > 0.0
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(13.0)
    }
}
