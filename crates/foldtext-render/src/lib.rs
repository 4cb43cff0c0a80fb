#![forbid(unsafe_code)]

//! Render kernel: cells, colors, styles, and the cell buffer.
//!
//! # Example
//! ```
//! use foldtext_render::buffer::Buffer;
//! use foldtext_render::cell::Cell;
//!
//! let mut buf = Buffer::new(4, 1);
//! buf.set(0, 0, Cell::from_char('o'));
//! buf.set(1, 0, Cell::from_char('k'));
//! assert_eq!(buf.row_text(0), "ok  ");
//! ```

pub mod buffer;
pub mod cell;
pub mod style;

pub use buffer::Buffer;
pub use cell::{Cell, CellContent, PackedRgba, StyleFlags};
pub use style::Style;
