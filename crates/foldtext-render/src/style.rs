#![forbid(unsafe_code)]

//! Optional-field text style.

use crate::cell::{Cell, PackedRgba, StyleFlags};

/// A style where every field is optional; unset fields leave the target
/// cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    #[inline]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub fn attrs(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.attrs(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.attrs(StyleFlags::DIM)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Combine with `other`; fields set on `self` win.
    #[must_use]
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            fg: self.fg.or(other.fg),
            bg: self.bg.or(other.bg),
            attrs: match (self.attrs, other.attrs) {
                (Some(a), Some(b)) => Some(a | b),
                (a, b) => a.or(b),
            },
        }
    }

    /// Apply the set fields to a cell.
    pub fn apply_to(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(attrs) = self.attrs {
            cell.flags |= attrs;
        }
    }
}
