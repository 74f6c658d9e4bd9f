#![forbid(unsafe_code)]

//! Geometry measurement.
//!
//! Every function here is a pure read of the surface's current layout. Callers
//! must only measure elements that participate in layout; detached or
//! undisplayed elements measure as zero.

use paneview_backend::{ElementId, Surface};
use paneview_core::geometry::{Axis, Rect, Thickness};

/// Capture position (relative to `reference`) and both box sizes of `el`.
pub fn measure<S: Surface + ?Sized>(surface: &S, el: ElementId, reference: ElementId) -> Rect {
    Rect::new(
        surface.offset_position(el, reference),
        surface.content_size(el),
        surface.total_size(el),
    )
}

/// Size of `el` along `axis`, without its position.
pub fn thickness_of<S: Surface + ?Sized>(surface: &S, el: ElementId, axis: Axis) -> Thickness {
    Thickness::new(
        surface.content_size(el).along(axis),
        surface.total_size(el).along(axis),
    )
}
