#![forbid(unsafe_code)]

//! Headless rendition of the split view stylesheet.
//!
//! [`SplitViewStylesheet`] lays out the split view parts the way the shipped
//! CSS does, for a root with a fixed size: the pane wrapper hugs the pane edge
//! at the pane's current thickness, the placeholder takes its inline size,
//! and the content fills the rest. Inline position and size overrides written
//! during playback are applied by the surface on top of this.
//!
//! Elements outside a split view are left to the surface's defaults.

use paneview_backend::{Direction, ElementId, StyleProp, parse_px};
use paneview_core::geometry::{Axis, Position, Size, Thickness};
use paneview_web::{BoxModel, LayoutEngine, LayoutView};

use super::config::{DisplayMode, Placement};
use super::render::{class, display_mode_class, placement_class};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitViewStylesheet {
    /// Root margin-box origin in document coordinates.
    pub origin: Position,
    pub size: Size,
    /// Pane thickness while shown.
    pub shown_pane: Thickness,
    /// Pane thickness while hidden; [`Thickness::ZERO`] for a pane that
    /// collapses completely.
    pub hidden_pane: Thickness,
}

impl SplitViewStylesheet {
    pub const fn new(origin: Position, size: Size, shown_pane: Thickness, hidden_pane: Thickness) -> Self {
        Self {
            origin,
            size,
            shown_pane,
            hidden_pane,
        }
    }

    fn frame(&self, view: &dyn LayoutView, root: ElementId) -> Frame {
        let placement = Placement::ALL
            .into_iter()
            .find(|p| view.has_class(root, placement_class(*p)))
            .unwrap_or_default();
        let display_mode = DisplayMode::ALL
            .into_iter()
            .find(|m| view.has_class(root, display_mode_class(*m)))
            .unwrap_or_default();
        let shown = view.has_class(root, class::PANE_SHOWN);
        let rtl = view.direction(root) == Direction::Rtl;
        Frame {
            origin: self.origin,
            size: self.size,
            axis: placement.axis(),
            trailing: placement.is_trailing(rtl),
            shown,
            overlay: display_mode == DisplayMode::Overlay,
            pane: if shown { self.shown_pane } else { self.hidden_pane },
        }
    }
}

fn split_view_root(view: &dyn LayoutView, el: ElementId) -> Option<ElementId> {
    let mut current = view.parent(el);
    for _ in 0..2 {
        let candidate = current?;
        if view.has_class(candidate, class::SPLIT_VIEW) {
            return Some(candidate);
        }
        current = view.parent(candidate);
    }
    None
}

fn inline_length(view: &dyn LayoutView, el: ElementId, axis: Axis) -> f64 {
    let prop = match axis {
        Axis::Horizontal => StyleProp::Width,
        Axis::Vertical => StyleProp::Height,
    };
    parse_px(&view.style(el, prop)).unwrap_or(0.0)
}

/// Root geometry as seen by one layout query.
struct Frame {
    origin: Position,
    size: Size,
    axis: Axis,
    trailing: bool,
    shown: bool,
    overlay: bool,
    pane: Thickness,
}

impl Frame {
    /// A box spanning the cross axis, `offset` into the root along the axis.
    fn slab(&self, offset: f64, content: f64, total: f64) -> BoxModel {
        let along = |len: f64| match self.axis {
            Axis::Horizontal => Size::new(len, self.size.height),
            Axis::Vertical => Size::new(self.size.width, len),
        };
        BoxModel {
            origin: self.origin.shifted(self.axis, offset),
            content: along(content),
            total: along(total),
        }
    }

    fn edge_offset(&self, thickness: f64) -> f64 {
        if self.trailing {
            self.size.along(self.axis) - thickness
        } else {
            0.0
        }
    }

    fn wrapper(&self) -> BoxModel {
        let t = self.pane.total;
        self.slab(self.edge_offset(t), t, t)
    }

    fn pane(&self) -> BoxModel {
        self.slab(self.edge_offset(self.pane.total), self.pane.content, self.pane.total)
    }

    fn placeholder(&self, reserved: f64) -> BoxModel {
        self.slab(self.edge_offset(reserved), reserved, reserved)
    }

    fn content(&self, reserved: f64) -> BoxModel {
        let occupied = if self.overlay && self.shown {
            reserved
        } else {
            self.pane.total
        };
        let rest = (self.size.along(self.axis) - occupied).max(0.0);
        let offset = if self.trailing { 0.0 } else { occupied };
        self.slab(offset, rest, rest)
    }
}

impl LayoutEngine for SplitViewStylesheet {
    fn layout(&self, view: &dyn LayoutView, el: ElementId) -> Option<BoxModel> {
        if view.has_class(el, class::SPLIT_VIEW) {
            return Some(BoxModel::bare(self.origin, self.size));
        }
        let root = split_view_root(view, el)?;
        let frame = self.frame(view, root);

        if view.has_class(el, class::PANE_WRAPPER) {
            Some(frame.wrapper())
        } else if view.has_class(el, class::PANE) {
            Some(frame.pane())
        } else if view.has_class(el, class::PANE_PLACEHOLDER) {
            Some(frame.placeholder(inline_length(view, el, frame.axis)))
        } else if view.has_class(el, class::CONTENT) {
            let reserved = view
                .children(root)
                .into_iter()
                .find(|c| view.has_class(*c, class::PANE_PLACEHOLDER))
                .map_or(0.0, |p| inline_length(view, p, frame.axis));
            Some(frame.content(reserved))
        } else {
            None
        }
    }
}
