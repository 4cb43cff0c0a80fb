#![forbid(unsafe_code)]

//! Text handling for foldtext.
//!
//! This crate provides the text side of the fold widget:
//! - [`Content`] - plain or styled text, mutually exclusive
//! - [`Span`] / [`StyledText`] - styled runs
//! - [`Font`] - monospace metrics in layout units
//! - [`TextMeasurer`] / [`TextLayouter`] - the measurement capability
//! - [`MonospaceMeasurer`] - exclusion-aware measurement on a cell grid
//!
//! # Example
//! ```
//! use foldtext_text::{Content, Font, LayoutConstraints, MonospaceMeasurer, TextMeasurer};
//!
//! let measurer = MonospaceMeasurer::new();
//! let constraints = LayoutConstraints::new(11.0, Font::terminal());
//! let height = measurer.measure(&Content::plain("hello world foo bar"), &constraints);
//! assert_eq!(height, 2.0);
//! ```

pub mod flow;
pub mod font;
pub mod measure;
pub mod text;
pub mod wrap;

pub use flow::{Fragment, LayoutLine, TextLayout};
pub use font::Font;
pub use measure::{
    DEFAULT_ELLIPSIS, LayoutConstraints, MonospaceMeasurer, TextLayouter, TextMeasurer,
};
pub use text::{Content, Span, StyledText};
pub use wrap::display_width;
