#![forbid(unsafe_code)]

//! Cell buffer.
//!
//! A `Buffer` is a width × height grid of [`Cell`]s in row-major order.
//! Wide characters occupy a head cell followed by continuation cells;
//! [`Buffer::set`] keeps that pairing consistent when cells are overwritten.
//!
//! # Example
//! ```
//! use foldtext_render::buffer::Buffer;
//! use foldtext_render::cell::Cell;
//!
//! let mut buffer = Buffer::new(80, 24);
//! buffer.set(0, 0, Cell::from_char('H'));
//! buffer.set(1, 0, Cell::from_char('i'));
//! ```

use crate::cell::{Cell, CellContent};
use foldtext_core::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a new buffer filled with default cells.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rectangle of the buffer.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Set the cell at (x, y).
    ///
    /// Out-of-bounds writes are ignored. A wide character that does not fit
    /// entirely inside the buffer is not written at all.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1);
        let end = x as usize + width;
        if end > self.width as usize || y >= self.height {
            return;
        }

        for i in 0..width {
            self.clear_overlap(x + i as u16, y);
        }

        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
        for i in 1..width {
            if let Some(idx) = self.index(x + i as u16, y) {
                self.cells[idx] = Cell::CONTINUATION;
            }
        }
    }

    /// Break any wide-character pairing that cell (x, y) participates in.
    fn clear_overlap(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let existing = self.cells[idx];

        if existing.is_continuation() {
            let mut head_x = x;
            while head_x > 0 {
                head_x -= 1;
                let Some(head_idx) = self.index(head_x, y) else {
                    break;
                };
                let head = self.cells[head_idx];
                self.cells[head_idx] = Cell::default();
                if !head.is_continuation() {
                    break;
                }
            }
        }

        let head_width = existing.content.width();
        if head_width > 1 {
            for i in 1..head_width {
                if let Some(tail_idx) = self.index(x + i as u16, y)
                    && self.cells[tail_idx].is_continuation()
                {
                    self.cells[tail_idx] = Cell::default();
                }
            }
        }
    }

    /// Fill a rectangular region with the given cell, clipped to the buffer.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = self.area().intersection(&rect);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Cells of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        assert!(y < self.height, "row {y} out of bounds");
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Plain text of row `y`; empty cells become spaces and continuation
    /// cells are skipped.
    pub fn row_text(&self, y: u16) -> String {
        self.row_cells(y)
            .iter()
            .filter_map(|cell| match cell.content {
                CellContent::Empty => Some(' '),
                CellContent::Char(c) => Some(c),
                CellContent::Continuation => None,
            })
            .collect()
    }

    /// All rows as plain text.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }
}
