#![forbid(unsafe_code)]
#![doc = "Element-tree boundary for paneview: the abstraction over a DOM-like host."]
#![doc = ""]
#![doc = "This crate defines the boundary between controls and platform-specific"]
#![doc = "element trees (a browser DOM via bindings, or the headless `paneview-web`"]
#![doc = "surface used for tests and host-driven embedding)."]

use core::fmt;
use core::time::Duration;

use paneview_core::geometry::{Position, Size};

/// Opaque handle to an element owned by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inline style properties a control may write.
///
/// Writing the empty string removes the inline override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProp {
    Position,
    ZIndex,
    Left,
    Top,
    Width,
    Height,
    Transform,
    Transition,
    Opacity,
}

impl StyleProp {
    /// CSS property name.
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::ZIndex => "z-index",
            Self::Left => "left",
            Self::Top => "top",
            Self::Width => "width",
            Self::Height => "height",
            Self::Transform => "transform",
            Self::Transition => "transition",
            Self::Opacity => "opacity",
        }
    }

    /// Every property, in declaration order.
    pub const ALL: [StyleProp; 9] = [
        Self::Position,
        Self::ZIndex,
        Self::Left,
        Self::Top,
        Self::Width,
        Self::Height,
        Self::Transform,
        Self::Transition,
        Self::Opacity,
    ];
}

/// Format a pixel length the way inline styles expect it (`"12px"`).
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Parse a pixel length written by [`px`]. Returns `None` for anything else.
pub fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Computed writing direction of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// A dispatched event, as seen by listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    name: &'static str,
    cancelable: bool,
    default_prevented: bool,
}

impl DomEvent {
    /// Create a bubbling event.
    pub const fn new(name: &'static str, cancelable: bool) -> Self {
        Self {
            name,
            cancelable,
            default_prevented: false,
        }
    }

    /// Event type name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether listeners may veto the default action.
    pub const fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Veto the default action. Has no effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Whether a listener vetoed the default action.
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Element-tree abstraction: structure, classes, inline style, measurement,
/// event dispatch, and transition-end delivery.
///
/// Implementations must answer layout queries synchronously from current
/// layout. Measuring an element that does not participate in layout returns
/// zero sizes.
pub trait Surface {
    /// Create a detached element.
    fn create_element(&mut self) -> ElementId;

    /// First element child of `el`, if any.
    fn first_element_child(&self, el: ElementId) -> Option<ElementId>;

    /// Children of `el` in document order.
    fn children(&self, el: ElementId) -> Vec<ElementId>;

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent.
    fn append_child(&mut self, parent: ElementId, child: ElementId);

    fn add_class(&mut self, el: ElementId, class: &str);

    fn remove_class(&mut self, el: ElementId, class: &str);

    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// Write an inline style property. The empty string clears it.
    fn set_style(&mut self, el: ElementId, prop: StyleProp, value: &str);

    /// Read an inline style property (empty when unset).
    fn style(&self, el: ElementId, prop: StyleProp) -> String;

    /// Content-box size.
    fn content_size(&self, el: ElementId) -> Size;

    /// Margin-box size.
    fn total_size(&self, el: ElementId) -> Size;

    /// Border-box offset of `el` relative to `reference`, minus `el`'s
    /// leading margins.
    fn offset_position(&self, el: ElementId, reference: ElementId) -> Position;

    /// Computed writing direction.
    fn direction(&self, el: ElementId) -> Direction;

    /// Whether `el` is attached to a live document (and therefore laid out).
    fn is_in_document(&self, el: ElementId) -> bool;

    /// Flush pending style so that a following style write starts a
    /// transition from the current value.
    fn resolve_styles(&mut self, el: ElementId);

    /// Dispatch `event` on `el`. Returns `false` if a listener vetoed it.
    fn dispatch_event(&mut self, el: ElementId, event: &mut DomEvent) -> bool;

    /// Elements whose running transition ended since the last call.
    ///
    /// `now` is the host's current monotonic time; hosts that receive real
    /// `transitionend` events may ignore it.
    fn drain_transition_ends(&mut self, now: Duration) -> Vec<ElementId>;

    /// Whether a control is already bound to `el`.
    fn is_control_host(&self, el: ElementId) -> bool;

    /// Record that a control is bound to `el`.
    fn mark_control_host(&mut self, el: ElementId);

    /// Release everything the host associates with the subtree at `el`.
    fn dispose_subtree(&mut self, el: ElementId);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn create_element(&mut self) -> ElementId {
        (**self).create_element()
    }
    fn first_element_child(&self, el: ElementId) -> Option<ElementId> {
        (**self).first_element_child(el)
    }
    fn children(&self, el: ElementId) -> Vec<ElementId> {
        (**self).children(el)
    }
    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        (**self).append_child(parent, child);
    }
    fn add_class(&mut self, el: ElementId, class: &str) {
        (**self).add_class(el, class);
    }
    fn remove_class(&mut self, el: ElementId, class: &str) {
        (**self).remove_class(el, class);
    }
    fn has_class(&self, el: ElementId, class: &str) -> bool {
        (**self).has_class(el, class)
    }
    fn set_style(&mut self, el: ElementId, prop: StyleProp, value: &str) {
        (**self).set_style(el, prop, value);
    }
    fn style(&self, el: ElementId, prop: StyleProp) -> String {
        (**self).style(el, prop)
    }
    fn content_size(&self, el: ElementId) -> Size {
        (**self).content_size(el)
    }
    fn total_size(&self, el: ElementId) -> Size {
        (**self).total_size(el)
    }
    fn offset_position(&self, el: ElementId, reference: ElementId) -> Position {
        (**self).offset_position(el, reference)
    }
    fn direction(&self, el: ElementId) -> Direction {
        (**self).direction(el)
    }
    fn is_in_document(&self, el: ElementId) -> bool {
        (**self).is_in_document(el)
    }
    fn resolve_styles(&mut self, el: ElementId) {
        (**self).resolve_styles(el);
    }
    fn dispatch_event(&mut self, el: ElementId, event: &mut DomEvent) -> bool {
        (**self).dispatch_event(el, event)
    }
    fn drain_transition_ends(&mut self, now: Duration) -> Vec<ElementId> {
        (**self).drain_transition_ends(now)
    }
    fn is_control_host(&self, el: ElementId) -> bool {
        (**self).is_control_host(el)
    }
    fn mark_control_host(&mut self, el: ElementId) {
        (**self).mark_control_host(el);
    }
    fn dispose_subtree(&mut self, el: ElementId) {
        (**self).dispose_subtree(el);
    }
}

/// Add `class` only when it is non-empty.
pub fn add_class_if(surface: &mut impl Surface, el: ElementId, class: Option<&str>) {
    if let Some(class) = class.filter(|c| !c.is_empty()) {
        surface.add_class(el, class);
    }
}

/// Remove `class` only when it is non-empty.
pub fn remove_class_if(surface: &mut impl Surface, el: ElementId, class: Option<&str>) {
    if let Some(class) = class.filter(|c| !c.is_empty()) {
        surface.remove_class(el, class);
    }
}
