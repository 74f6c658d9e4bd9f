#![forbid(unsafe_code)]

//! Pluggable layout for the headless element tree.
//!
//! The headless surface does not implement CSS. Instead a [`LayoutEngine`]
//! answers "where is this element and how big is it" from the current
//! classes and inline styles, which is all a control needs to observe.

use paneview_backend::{Direction, ElementId, StyleProp};
use paneview_core::geometry::{Position, Size};

/// Geometry of one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxModel {
    /// Margin-box top-left, in document coordinates.
    pub origin: Position,
    /// Content-box size.
    pub content: Size,
    /// Margin-box size.
    pub total: Size,
}

impl BoxModel {
    /// A box whose content fills its margin box.
    pub const fn bare(origin: Position, size: Size) -> Self {
        Self {
            origin,
            content: size,
            total: size,
        }
    }

    /// A box that does not participate in layout.
    pub const fn collapsed() -> Self {
        Self {
            origin: Position::new(0.0, 0.0),
            content: Size::new(0.0, 0.0),
            total: Size::new(0.0, 0.0),
        }
    }
}

/// Read-only view of the tree handed to a [`LayoutEngine`].
pub trait LayoutView {
    fn parent(&self, el: ElementId) -> Option<ElementId>;
    fn children(&self, el: ElementId) -> Vec<ElementId>;
    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn style(&self, el: ElementId, prop: StyleProp) -> String;
    fn direction(&self, el: ElementId) -> Direction;
}

/// Computes element geometry from the tree's current state.
///
/// Returning `None` defers to the fixed box stored on the element (or a
/// collapsed box if none was stored).
pub trait LayoutEngine {
    fn layout(&self, view: &dyn LayoutView, el: ElementId) -> Option<BoxModel>;
}

impl<F> LayoutEngine for F
where
    F: Fn(&dyn LayoutView, ElementId) -> Option<BoxModel>,
{
    fn layout(&self, view: &dyn LayoutView, el: ElementId) -> Option<BoxModel> {
        self(view, el)
    }
}
