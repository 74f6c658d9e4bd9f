#![forbid(unsafe_code)]

//! Projection of split view state onto the element tree.
//!
//! Rendering is diffed against what was last written, so calling it
//! repeatedly with unchanged state touches nothing.

use paneview_backend::{StyleProp, Surface, add_class_if, px, remove_class_if};
use paneview_core::geometry::{Axis, Thickness};

use super::SplitView;
use super::config::{DisplayMode, Placement};
use crate::probe;

/// Class names forming the stylesheet contract.
pub mod class {
    pub const SPLIT_VIEW: &str = "win-splitview";
    pub const DISPOSABLE: &str = "win-disposable";
    pub const PANE: &str = "win-splitview-pane";
    pub const CONTENT: &str = "win-splitview-content";
    pub const PANE_HIDDEN: &str = "win-splitview-pane-hidden";
    pub const PANE_SHOWN: &str = "win-splitview-pane-shown";
    pub const RTL: &str = "win-splitview-rtl";
    pub const PANE_PLACEHOLDER: &str = "win-splitview-paneplaceholder";
    pub const PANE_WRAPPER: &str = "win-splitview-panewrapper";

    pub const PLACEMENT_LEFT: &str = "win-splitview-placementleft";
    pub const PLACEMENT_RIGHT: &str = "win-splitview-placementright";
    pub const PLACEMENT_TOP: &str = "win-splitview-placementtop";
    pub const PLACEMENT_BOTTOM: &str = "win-splitview-placementbottom";

    pub const INLINE_MODE: &str = "win-splitview-inlinemode";
    pub const OVERLAY_MODE: &str = "win-splitview-overlaymode";
}

pub const fn placement_class(placement: Placement) -> &'static str {
    match placement {
        Placement::Left => class::PLACEMENT_LEFT,
        Placement::Right => class::PLACEMENT_RIGHT,
        Placement::Top => class::PLACEMENT_TOP,
        Placement::Bottom => class::PLACEMENT_BOTTOM,
    }
}

pub const fn display_mode_class(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Inline => class::INLINE_MODE,
        DisplayMode::Overlay => class::OVERLAY_MODE,
    }
}

/// Last values written to the tree. `None` means never written.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Rendered {
    pane_is_first: Option<bool>,
    shown_mode: Option<bool>,
    placement: Option<Placement>,
    display_mode: Option<DisplayMode>,
    /// Inline width and height of the placeholder.
    placeholder: Option<(String, String)>,
}

impl<S: Surface> SplitView<S> {
    pub(super) fn render(&mut self) {
        let root = self.parts.root;

        let pane_first = self.placement.pane_is_first();
        if self.rendered.pane_is_first != Some(pane_first) {
            let order = if pane_first {
                [self.parts.pane_placeholder, self.parts.pane_wrapper, self.parts.content]
            } else {
                [self.parts.content, self.parts.pane_wrapper, self.parts.pane_placeholder]
            };
            for el in order {
                self.surface.append_child(root, el);
            }
            self.rendered.pane_is_first = Some(pane_first);
        }

        if self.rendered.shown_mode != Some(self.shown_mode) {
            let (stale, fresh) = if self.shown_mode {
                (class::PANE_HIDDEN, class::PANE_SHOWN)
            } else {
                (class::PANE_SHOWN, class::PANE_HIDDEN)
            };
            self.surface.remove_class(root, stale);
            self.surface.add_class(root, fresh);
            self.rendered.shown_mode = Some(self.shown_mode);
        }

        if self.rendered.placement != Some(self.placement) {
            remove_class_if(&mut self.surface, root, self.rendered.placement.map(placement_class));
            add_class_if(&mut self.surface, root, Some(placement_class(self.placement)));
            self.rendered.placement = Some(self.placement);
        }

        if self.rendered.display_mode != Some(self.display_mode) {
            remove_class_if(
                &mut self.surface,
                root,
                self.rendered.display_mode.map(display_mode_class),
            );
            add_class_if(&mut self.surface, root, Some(display_mode_class(self.display_mode)));
            self.rendered.display_mode = Some(self.display_mode);
        }

        let placeholder = if self.shown_mode && self.display_mode == DisplayMode::Overlay {
            let reserved = px(self.hidden_thickness().total);
            match self.placement.axis() {
                Axis::Horizontal => (reserved, String::new()),
                Axis::Vertical => (String::new(), reserved),
            }
        } else {
            (String::new(), String::new())
        };
        if self.rendered.placeholder.as_ref() != Some(&placeholder) {
            let el = self.parts.pane_placeholder;
            self.surface.set_style(el, StyleProp::Width, &placeholder.0);
            self.surface.set_style(el, StyleProp::Height, &placeholder.1);
            self.rendered.placeholder = Some(placeholder);
        }
    }

    /// Pane wrapper thickness in the hidden arrangement, measured at most once
    /// per layout change.
    pub(super) fn hidden_thickness(&mut self) -> Thickness {
        if let Some(thickness) = self.cached_hidden {
            return thickness;
        }
        let root = self.parts.root;
        if self.shown_mode {
            self.surface.remove_class(root, class::PANE_SHOWN);
            self.surface.add_class(root, class::PANE_HIDDEN);
        }
        let thickness = probe::thickness_of(
            &self.surface,
            self.parts.pane_wrapper,
            self.placement.axis(),
        );
        if self.shown_mode {
            self.surface.remove_class(root, class::PANE_HIDDEN);
            self.surface.add_class(root, class::PANE_SHOWN);
        }
        self.cached_hidden = Some(thickness);
        thickness
    }
}
