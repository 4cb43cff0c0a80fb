#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces are used:
//! - [`Rect`] is in terminal cells (0-indexed, origin at top-left) and is what
//!   a cell buffer is painted in.
//! - [`LayoutRect`] and [`Size`] are in layout units, the space text
//!   measurement and fold geometry are computed in. A font maps one cell to
//!   `advance × line_height` layout units.

/// A rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }
}

/// A width/height pair in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A rectangle in layout units.
///
/// Unlike [`Rect`], the edges are fractional: font metrics rarely land on
/// whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    /// Empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the rectangle has no usable area (including NaN extents).
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the rectangle intersects the horizontal band `[top, bottom)`.
    #[inline]
    pub fn overlaps_band(&self, top: f32, bottom: f32) -> bool {
        !self.is_empty() && self.y < bottom && self.bottom() > top
    }

    /// Place `size` so its bottom-right corner coincides with this rectangle's.
    ///
    /// The result may extend past the left or top edge when `size` is larger
    /// than `self`.
    #[must_use]
    pub fn anchor_bottom_right(&self, size: Size) -> LayoutRect {
        LayoutRect::new(
            self.right() - size.width,
            self.bottom() - size.height,
            size.width,
            size.height,
        )
    }

    /// Convert to terminal cells given the size of one cell in layout units.
    ///
    /// The origin rounds down and the far edge rounds up, so the cell
    /// rectangle always covers the layout rectangle. Negative coordinates
    /// clamp to zero.
    pub fn to_cells(&self, cell_width: f32, cell_height: f32) -> Rect {
        if self.is_empty() || cell_width <= 0.0 || cell_height <= 0.0 {
            return Rect::default();
        }
        let left = to_cell_floor(self.x / cell_width);
        let top = to_cell_floor(self.y / cell_height);
        let right = to_cell_ceil(self.right() / cell_width);
        let bottom = to_cell_ceil(self.bottom() / cell_height);
        Rect::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }
}

fn to_cell_floor(value: f32) -> u16 {
    value.floor().clamp(0.0, f32::from(u16::MAX)) as u16
}

fn to_cell_ceil(value: f32) -> u16 {
    value.ceil().clamp(0.0, f32::from(u16::MAX)) as u16
}
