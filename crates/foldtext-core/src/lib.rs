#![forbid(unsafe_code)]

//! Core: geometry primitives and logging setup shared by the foldtext crates.

pub mod geometry;
pub mod logging;

pub use geometry::{LayoutRect, Rect, Size};
