#![forbid(unsafe_code)]

//! In-memory element tree implementing [`Surface`].
//!
//! `MemoryDom` is a cheap, cloneable handle: every clone observes the same
//! tree, the way script handles to a browser document do. It simulates just
//! enough of a browser for controls to run unmodified:
//!
//! - **Layout** comes from a pluggable [`LayoutEngine`] (or fixed boxes),
//!   with inline `position`/`left`/`top`/`width`/`height` overrides applied.
//! - **Transitions** start when an animatable property changes while a
//!   matching `transition` declaration is present, and end once the host's
//!   clock passes `start + duration`. Unchanged values and zero durations
//!   never produce a transition end, exactly like a browser.
//! - **Events** bubble from the target through its ancestors.
//!
//! Listeners run with the tree unborrowed, so a listener may hold its own
//! `MemoryDom` clone and inspect or mutate the tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use ahash::AHashMap;
use paneview_backend::{Direction, DomEvent, ElementId, StyleProp, Surface, parse_px};
use paneview_core::animation::{AnimatedProperty, Easing, TransitionProperty, TransitionSpec};
use paneview_core::geometry::{Position, Size};

use crate::layout::{BoxModel, LayoutEngine, LayoutView};

type Listener = Box<dyn FnMut(&mut DomEvent)>;

/// Handle returned by [`MemoryDom::add_event_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A dispatched event as recorded by the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    pub target: ElementId,
    pub name: &'static str,
    pub default_prevented: bool,
}

#[derive(Default)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    styles: AHashMap<StyleProp, String>,
    fixed_box: Option<BoxModel>,
    direction: Option<Direction>,
    listeners: Vec<(String, ListenerId, Listener)>,
    control_host: bool,
    dispose_count: u32,
}

#[derive(Debug, Clone, Copy)]
struct RunningTransition {
    el: ElementId,
    property: TransitionProperty,
    easing: Easing,
    started_at: Duration,
    ends_at: Duration,
    from: Option<AnimatedProperty>,
    to: Option<AnimatedProperty>,
}

impl RunningTransition {
    /// Value at host time `at`, following the timing curve.
    fn sample(&self, at: Duration) -> Option<AnimatedProperty> {
        let (from, to) = (self.from?, self.to?);
        let duration = self.ends_at.saturating_sub(self.started_at);
        let progress = if at >= self.ends_at || duration.is_zero() {
            1.0
        } else {
            at.saturating_sub(self.started_at).as_secs_f64() / duration.as_secs_f64()
        };
        from.lerp(to, self.easing.apply(progress))
    }
}

struct DomTree {
    nodes: Vec<Node>,
    body: ElementId,
    layout: Option<Rc<dyn LayoutEngine>>,
    now: Duration,
    running: Vec<RunningTransition>,
    event_log: Vec<LoggedEvent>,
    mutations: u64,
    next_listener: u64,
    deliver_transition_ends: bool,
}

impl DomTree {
    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.0 as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.0 as usize)
    }

    fn create(&mut self) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node::default());
        id
    }

    fn in_document(&self, el: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if current == self.body {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    fn ancestors_inclusive(&self, el: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if self.node(current).is_none() {
                break;
            }
            path.push(current);
            cursor = self.node(current).and_then(|n| n.parent);
        }
        path
    }

    fn style_of(&self, el: ElementId, prop: StyleProp) -> String {
        self.node(el)
            .and_then(|n| n.styles.get(&prop).cloned())
            .unwrap_or_default()
    }

    fn box_of(&self, el: ElementId) -> BoxModel {
        if !self.in_document(el) {
            return BoxModel::collapsed();
        }
        let mut model = self
            .layout
            .as_ref()
            .and_then(|engine| engine.layout(self, el))
            .or_else(|| self.node(el).and_then(|n| n.fixed_box))
            .unwrap_or_else(BoxModel::collapsed);

        if let Some(width) = parse_px(&self.style_of(el, StyleProp::Width)) {
            let chrome = model.total.width - model.content.width;
            model.content.width = width;
            model.total.width = width + chrome;
        }
        if let Some(height) = parse_px(&self.style_of(el, StyleProp::Height)) {
            let chrome = model.total.height - model.content.height;
            model.content.height = height;
            model.total.height = height + chrome;
        }
        if self.style_of(el, StyleProp::Position) == "absolute" {
            let container = self
                .node(el)
                .and_then(|n| n.parent)
                .map(|p| self.box_of(p).origin)
                .unwrap_or_default();
            if let Some(left) = parse_px(&self.style_of(el, StyleProp::Left)) {
                model.origin.left = container.left + left;
            }
            if let Some(top) = parse_px(&self.style_of(el, StyleProp::Top)) {
                model.origin.top = container.top + top;
            }
        }
        model
    }

    fn start_or_cancel_transition(
        &mut self,
        el: ElementId,
        property: TransitionProperty,
        old: &str,
        new: &str,
    ) {
        self.running
            .retain(|t| !(t.el == el && t.property == property));
        if old == new || !self.in_document(el) {
            return;
        }
        let Some(spec) = TransitionSpec::parse(&self.style_of(el, StyleProp::Transition)) else {
            return;
        };
        if spec.property != property || spec.duration.is_zero() {
            return;
        }
        let ends_at = self.now.saturating_add(spec.duration);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "paneview.web",
            element = %el,
            property = property.css_name(),
            ends_at_us = ends_at.as_micros() as u64,
            "transition started"
        );
        self.running.push(RunningTransition {
            el,
            property,
            easing: spec.easing,
            started_at: self.now,
            ends_at,
            from: AnimatedProperty::parse(property, old),
            to: AnimatedProperty::parse(property, new),
        });
    }
}

impl LayoutView for DomTree {
    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).and_then(|n| n.parent)
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.node(el).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn style(&self, el: ElementId, prop: StyleProp) -> String {
        self.style_of(el, prop)
    }

    fn direction(&self, el: ElementId) -> Direction {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            if let Some(dir) = node.direction {
                return dir;
            }
            cursor = node.parent;
        }
        Direction::Ltr
    }
}

/// Headless element tree. See the [module docs](self).
#[derive(Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<DomTree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.borrow();
        f.debug_struct("MemoryDom")
            .field("nodes", &tree.nodes.len())
            .field("now", &tree.now)
            .field("running", &tree.running.len())
            .finish_non_exhaustive()
    }
}

impl MemoryDom {
    /// Create a document containing only its body element.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = DomTree {
            nodes: Vec::new(),
            body: ElementId(0),
            layout: None,
            now: Duration::ZERO,
            running: Vec::new(),
            event_log: Vec::new(),
            mutations: 0,
            next_listener: 0,
            deliver_transition_ends: true,
        };
        tree.body = tree.create();
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// The document body. Elements are laid out only when connected to it.
    pub fn body(&self) -> ElementId {
        self.tree.borrow().body
    }

    /// Install the layout engine consulted on every measurement.
    pub fn set_layout(&self, engine: impl LayoutEngine + 'static) {
        self.tree.borrow_mut().layout = Some(Rc::new(engine));
    }

    /// Give `el` a fixed box, used when no layout engine answers for it.
    pub fn set_box(&self, el: ElementId, model: BoxModel) {
        if let Some(node) = self.tree.borrow_mut().node_mut(el) {
            node.fixed_box = Some(model);
        }
    }

    /// Set the `dir` of `el`; descendants inherit it.
    pub fn set_direction(&self, el: ElementId, direction: Direction) {
        if let Some(node) = self.tree.borrow_mut().node_mut(el) {
            node.direction = Some(direction);
        }
    }

    /// Register a listener for events named `name` dispatched on `el` or a
    /// descendant.
    pub fn add_event_listener(
        &self,
        el: ElementId,
        name: &str,
        listener: impl FnMut(&mut DomEvent) + 'static,
    ) -> ListenerId {
        let mut tree = self.tree.borrow_mut();
        tree.next_listener += 1;
        let id = ListenerId(tree.next_listener);
        if let Some(node) = tree.node_mut(el) {
            node.listeners
                .push((name.to_string(), id, Box::new(listener)));
        }
        id
    }

    /// Remove a listener. Listeners cannot remove themselves mid-dispatch.
    pub fn remove_event_listener(&self, el: ElementId, id: ListenerId) {
        if let Some(node) = self.tree.borrow_mut().node_mut(el) {
            node.listeners.retain(|(_, lid, _)| *lid != id);
        }
    }

    /// Every event dispatched so far, oldest first.
    pub fn event_log(&self) -> Vec<LoggedEvent> {
        self.tree.borrow().event_log.clone()
    }

    /// Names of dispatched events, oldest first.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.tree
            .borrow()
            .event_log
            .iter()
            .map(|e| e.name)
            .collect()
    }

    pub fn clear_event_log(&self) {
        self.tree.borrow_mut().event_log.clear();
    }

    /// Classes of `el` in insertion order.
    pub fn class_list(&self, el: ElementId) -> Vec<String> {
        self.tree
            .borrow()
            .node(el)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        LayoutView::parent(&*self.tree.borrow(), el)
    }

    /// Number of transitions currently running on `el`.
    pub fn running_transitions(&self, el: ElementId) -> usize {
        self.tree
            .borrow()
            .running
            .iter()
            .filter(|t| t.el == el)
            .count()
    }

    /// Start and end values of the `property` transition running on `el`.
    pub fn transition_endpoints(
        &self,
        el: ElementId,
        property: TransitionProperty,
    ) -> Option<(AnimatedProperty, AnimatedProperty)> {
        self.tree
            .borrow()
            .running
            .iter()
            .find(|t| t.el == el && t.property == property)
            .and_then(|t| Some((t.from?, t.to?)))
    }

    /// Value of `property` on `el` at host time `at`.
    ///
    /// While a transition runs the value follows its timing curve; otherwise
    /// it is the inline value.
    pub fn animated_value(
        &self,
        el: ElementId,
        property: TransitionProperty,
        at: Duration,
    ) -> Option<AnimatedProperty> {
        let tree = self.tree.borrow();
        match tree
            .running
            .iter()
            .find(|t| t.el == el && t.property == property)
        {
            Some(running) => running.sample(at),
            None => {
                let prop = match property {
                    TransitionProperty::Transform => StyleProp::Transform,
                    TransitionProperty::Opacity => StyleProp::Opacity,
                };
                AnimatedProperty::parse(property, &tree.style_of(el, prop))
            }
        }
    }

    /// Whether any transition is running anywhere in the tree.
    pub fn is_animating(&self) -> bool {
        !self.tree.borrow().running.is_empty()
    }

    /// The host time last passed to [`Surface::drain_transition_ends`].
    pub fn now(&self) -> Duration {
        self.tree.borrow().now
    }

    /// Count of structural, class, and style writes since creation.
    pub fn mutation_count(&self) -> u64 {
        self.tree.borrow().mutations
    }

    /// Stop (or resume) reporting finished transitions, the way a browser
    /// drops `transitionend` for elements that were hidden mid-flight.
    pub fn set_transition_ends_delivered(&self, delivered: bool) {
        self.tree.borrow_mut().deliver_transition_ends = delivered;
    }

    /// How many times the subtree containing `el` was disposed.
    pub fn dispose_count(&self, el: ElementId) -> u32 {
        self.tree
            .borrow()
            .node(el)
            .map_or(0, |n| n.dispose_count)
    }

    /// Layout box of `el` after inline overrides.
    pub fn box_of(&self, el: ElementId) -> BoxModel {
        self.tree.borrow().box_of(el)
    }
}

impl Surface for MemoryDom {
    fn create_element(&mut self) -> ElementId {
        self.tree.borrow_mut().create()
    }

    fn first_element_child(&self, el: ElementId) -> Option<ElementId> {
        self.tree
            .borrow()
            .node(el)
            .and_then(|n| n.children.first().copied())
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        LayoutView::children(&*self.tree.borrow(), el)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        let mut tree = self.tree.borrow_mut();
        if parent == child || tree.node(parent).is_none() || tree.node(child).is_none() {
            return;
        }
        tree.mutations += 1;
        if let Some(old) = tree.node(child).and_then(|n| n.parent) {
            if let Some(node) = tree.node_mut(old) {
                node.children.retain(|c| *c != child);
            }
        }
        if let Some(node) = tree.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = tree.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        let mut tree = self.tree.borrow_mut();
        tree.mutations += 1;
        if let Some(node) = tree.node_mut(el) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        let mut tree = self.tree.borrow_mut();
        tree.mutations += 1;
        if let Some(node) = tree.node_mut(el) {
            node.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        LayoutView::has_class(&*self.tree.borrow(), el, class)
    }

    fn set_style(&mut self, el: ElementId, prop: StyleProp, value: &str) {
        let mut tree = self.tree.borrow_mut();
        tree.mutations += 1;
        let Some(node) = tree.node_mut(el) else {
            return;
        };
        let old = if value.is_empty() {
            node.styles.remove(&prop)
        } else {
            node.styles.insert(prop, value.to_string())
        }
        .unwrap_or_default();

        match prop {
            StyleProp::Transform => {
                tree.start_or_cancel_transition(el, TransitionProperty::Transform, &old, value);
            }
            StyleProp::Opacity => {
                tree.start_or_cancel_transition(el, TransitionProperty::Opacity, &old, value);
            }
            StyleProp::Transition => {
                let keep = TransitionSpec::parse(value).map(|spec| spec.property);
                tree.running
                    .retain(|t| t.el != el || Some(t.property) == keep);
            }
            _ => {}
        }
    }

    fn style(&self, el: ElementId, prop: StyleProp) -> String {
        self.tree.borrow().style_of(el, prop)
    }

    fn content_size(&self, el: ElementId) -> Size {
        self.tree.borrow().box_of(el).content
    }

    fn total_size(&self, el: ElementId) -> Size {
        self.tree.borrow().box_of(el).total
    }

    fn offset_position(&self, el: ElementId, reference: ElementId) -> Position {
        let tree = self.tree.borrow();
        let own = tree.box_of(el).origin;
        let base = tree.box_of(reference).origin;
        Position::new(own.left - base.left, own.top - base.top)
    }

    fn direction(&self, el: ElementId) -> Direction {
        LayoutView::direction(&*self.tree.borrow(), el)
    }

    fn is_in_document(&self, el: ElementId) -> bool {
        self.tree.borrow().in_document(el)
    }

    fn resolve_styles(&mut self, _el: ElementId) {
        // Inline writes are applied immediately; there is nothing to flush.
    }

    fn dispatch_event(&mut self, el: ElementId, event: &mut DomEvent) -> bool {
        let path = self.tree.borrow().ancestors_inclusive(el);
        for current in path {
            let mut taken = match self.tree.borrow_mut().node_mut(current) {
                Some(node) => std::mem::take(&mut node.listeners),
                None => continue,
            };
            for (name, _, listener) in &mut taken {
                if name == event.name() {
                    listener(event);
                }
            }
            let mut tree = self.tree.borrow_mut();
            if let Some(node) = tree.node_mut(current) {
                let added = std::mem::take(&mut node.listeners);
                taken.extend(added);
                node.listeners = taken;
            }
        }
        self.tree.borrow_mut().event_log.push(LoggedEvent {
            target: el,
            name: event.name(),
            default_prevented: event.default_prevented(),
        });
        !event.default_prevented()
    }

    fn drain_transition_ends(&mut self, now: Duration) -> Vec<ElementId> {
        let mut tree = self.tree.borrow_mut();
        tree.now = tree.now.max(now);
        let now = tree.now;
        let mut ended: Vec<RunningTransition> = Vec::new();
        tree.running.retain(|t| {
            if t.ends_at <= now {
                ended.push(*t);
                false
            } else {
                true
            }
        });
        if !tree.deliver_transition_ends {
            return Vec::new();
        }
        ended.sort_by_key(|t| t.ends_at);
        #[cfg(feature = "tracing")]
        for t in &ended {
            tracing::trace!(
                target: "paneview.web",
                element = %t.el,
                property = t.property.css_name(),
                "transition ended"
            );
        }
        ended.into_iter().map(|t| t.el).collect()
    }

    fn is_control_host(&self, el: ElementId) -> bool {
        self.tree.borrow().node(el).is_some_and(|n| n.control_host)
    }

    fn mark_control_host(&mut self, el: ElementId) {
        if let Some(node) = self.tree.borrow_mut().node_mut(el) {
            node.control_host = true;
        }
    }

    fn dispose_subtree(&mut self, el: ElementId) {
        let mut tree = self.tree.borrow_mut();
        let mut stack = vec![el];
        while let Some(current) = stack.pop() {
            if let Some(node) = tree.node_mut(current) {
                node.dispose_count += 1;
                stack.extend(node.children.iter().copied());
            }
        }
    }
}
