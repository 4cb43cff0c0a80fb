#![forbid(unsafe_code)]

//! Collapsible text for foldtext.
//!
//! - [`FoldEngine`](fold::FoldEngine) measures content against a line cap,
//!   decides whether it can fold, computes the widget height for the folded
//!   and unfolded states, and reserves space for the toggle affordance.
//! - [`FoldText`](fold_text::FoldText) paints an engine's current output
//!   into a [`Buffer`].
//!
//! # Example
//! ```
//! use foldtext_core::geometry::LayoutRect;
//! use foldtext_text::MonospaceMeasurer;
//! use foldtext_widgets::config::FoldConfig;
//! use foldtext_widgets::fold::{FoldEngine, FoldState};
//!
//! let mut engine = FoldEngine::new(MonospaceMeasurer::new(), FoldConfig::terminal());
//! engine.set_bounds(LayoutRect::new(0.0, 0.0, 10.0, 0.0));
//! engine.set_text(Some("one two three four five six seven eight nine ten"));
//! assert!(engine.can_fold());
//! assert_eq!(engine.measured_height(), 3.0);
//!
//! engine.toggle();
//! assert_eq!(engine.fold_state(), FoldState::Unfolded);
//! assert_eq!(engine.applied_line_cap(), 0);
//! ```

pub mod config;
pub mod exclusion;
pub mod fold;
pub mod fold_text;
pub mod observer;

pub use config::{AffordanceLabels, ConfigError, FoldConfig};
pub use exclusion::compute_affordance_rect;
pub use fold::{
    Affordance, EffectiveState, FoldEngine, FoldInputs, FoldOutput, FoldState, ToggleOutcome,
    UpdateOutcome, apply_state, can_fold,
};
pub use fold_text::FoldText;
pub use observer::{DeferredQueue, FoldCommand, HeightObserver};

use foldtext_core::geometry::Rect;
use foldtext_render::buffer::Buffer;
use foldtext_render::cell::Cell;
use foldtext_render::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Buffer` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the buffer at the given area.
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// Draw a text span into a buffer at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive).
pub(crate) fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x.saturating_add(w as u16) > max_x {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            style.apply_to(&mut cell);
            buf.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}
