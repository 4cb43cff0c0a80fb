#![forbid(unsafe_code)]

//! Cell types: content, packed colors, and style flags.

use unicode_width::UnicodeWidthChar;

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CellContent {
    /// Nothing drawn; presents as a space.
    #[default]
    Empty,
    /// A single character.
    Char(char),
    /// Tail of a wide character owned by the cell to the left.
    Continuation,
}

impl CellContent {
    /// Display width in cells (0 for continuations and zero-width chars).
    #[inline]
    pub fn width(self) -> usize {
        match self {
            Self::Empty => 1,
            Self::Char(c) => c.width().unwrap_or(0),
            Self::Continuation => 0,
        }
    }

    #[inline]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            _ => None,
        }
    }
}

/// A 32-bit packed RGBA color, `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// True when the color has any opacity.
    #[inline]
    pub const fn is_visible(self) -> bool {
        self.a() != 0
    }
}

bitflags::bitflags! {
    /// 8-bit cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0010;
        /// Italic text.
        const ITALIC        = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE     = 0b0000_1000;
        /// Reverse video (swap fg/bg).
        const REVERSE       = 0b0010_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0100_0000;
    }
}

/// A single terminal cell.
///
/// The default cell is empty with a white foreground, transparent
/// background, and no style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub content: CellContent,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub flags: StyleFlags,
}

impl Cell {
    /// A continuation cell (placeholder for wide characters).
    pub const CONTINUATION: Self = Self {
        content: CellContent::Continuation,
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        flags: StyleFlags::empty(),
    };

    #[inline]
    pub const fn new(content: CellContent) -> Self {
        Self {
            content,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::TRANSPARENT,
            flags: StyleFlags::empty(),
        }
    }

    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::new(CellContent::Char(c))
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }

}

impl Default for Cell {
    fn default() -> Self {
        Self::new(CellContent::Empty)
    }
}
