#![forbid(unsafe_code)]

//! Placement of the toggle affordance.

use foldtext_core::geometry::LayoutRect;
use foldtext_text::{Font, TextMeasurer};

/// Rectangle of the affordance inside `bounds`.
///
/// Sized to the label's natural single-line size under `font` and anchored
/// so its bottom-right corner coincides with the bounds' bottom-right
/// corner. The result is computed fresh on every call.
pub fn compute_affordance_rect<M: TextMeasurer + ?Sized>(
    measurer: &M,
    bounds: LayoutRect,
    label: &str,
    font: &Font,
) -> LayoutRect {
    let size = measurer.label_size(label, font);
    bounds.anchor_bottom_right(size)
}
