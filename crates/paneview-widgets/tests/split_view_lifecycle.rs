//! Show / hide sequences driven end to end against the headless surface.
//!
//! Each test mounts a split view in a [`MemoryDom`] laid out by
//! [`SplitViewStylesheet`] and advances host time in 16ms frames.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use paneview_backend::{ElementId, StyleProp, Surface};
use paneview_core::animation::{AnimatedProperty, TransitionProperty};
use paneview_core::geometry::{Axis, Position, Size, Thickness};
use paneview_core::scheduler::{Clock, DeterministicClock};
use paneview_web::MemoryDom;
use paneview_widgets::split_view::{
    AnimationConfig, DisplayMode, PaneState, Placement, SplitView, SplitViewConfig,
    SplitViewOptions, SplitViewStylesheet, class,
};
use pretty_assertions::assert_eq;

const FRAME: Duration = Duration::from_millis(16);

struct Harness {
    dom: MemoryDom,
    view: SplitView<MemoryDom>,
    clock: DeterministicClock,
}

impl Harness {
    fn new(options: SplitViewOptions) -> Self {
        Self::with_config(SplitViewConfig {
            options,
            ..SplitViewConfig::default()
        })
    }

    fn with_config(config: SplitViewConfig) -> Self {
        let mut dom = MemoryDom::new();
        dom.set_layout(SplitViewStylesheet::new(
            Position::new(0.0, 0.0),
            Size::new(800.0, 600.0),
            Thickness::new(320.0, 328.0),
            Thickness::new(40.0, 48.0),
        ));
        let host = dom.create_element();
        let pane = dom.create_element();
        let body_text = dom.create_element();
        dom.append_child(host, pane);
        dom.append_child(host, body_text);
        let body = dom.body();
        dom.append_child(body, host);

        let clock = DeterministicClock::new();
        let mut view = SplitView::with_config(dom.clone(), host, config).unwrap();
        view.tick_on(&clock);
        Self { dom, view, clock }
    }

    fn root(&self) -> ElementId {
        self.view.element()
    }

    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn frame(&mut self) {
        self.clock.advance(FRAME);
        self.view.tick_on(&self.clock);
    }

    /// Run frames until the view is idle. Panics after ten seconds of host time.
    fn settle(&mut self) {
        for _ in 0..625 {
            self.frame();
            if self.view.is_idle() {
                return;
            }
        }
        panic!("split view never settled; state {}", self.view.state_name());
    }

    fn frames_until(&mut self, pred: impl Fn(PaneState) -> bool) {
        for _ in 0..625 {
            if pred(self.view.state()) {
                return;
            }
            self.frame();
        }
        panic!("state never reached; stuck in {}", self.view.state_name());
    }

    fn veto(&self, event: &'static str) -> Rc<Cell<bool>> {
        let active = Rc::new(Cell::new(true));
        let flag = Rc::clone(&active);
        self.dom.add_event_listener(self.root(), event, move |e| {
            if flag.get() {
                e.prevent_default();
            }
        });
        active
    }
}

#[test]
fn show_then_hide_fires_one_pair_each() {
    let mut h = Harness::new(SplitViewOptions::default());
    assert_eq!(h.view.state(), PaneState::Hidden);

    h.view.show_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Shown);
    assert!(!h.view.is_hidden());
    assert_eq!(h.dom.event_names(), vec!["beforeshow", "aftershow"]);

    h.view.hide_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Hidden);
    assert_eq!(
        h.dom.event_names(),
        vec!["beforeshow", "aftershow", "beforehide", "afterhide"]
    );
}

#[test]
fn requests_are_observed_on_the_next_tick() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.view.show_pane();
    assert_eq!(h.view.state(), PaneState::RequestingShow);
    assert!(h.dom.event_names().is_empty());

    h.frame();
    assert_eq!(h.dom.event_names(), vec!["beforeshow"]);
    assert!(matches!(h.view.state(), PaneState::Showing { .. }));
}

#[test]
fn repeated_requests_fire_once() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.view.show_pane();
    h.view.show_pane();
    h.view.set_hidden(false);
    h.settle();
    h.view.show_pane();
    h.settle();
    assert_eq!(h.dom.event_names(), vec!["beforeshow", "aftershow"]);
}

#[test]
fn vetoed_show_stays_hidden() {
    let mut h = Harness::new(SplitViewOptions::default());
    let veto = h.veto("beforeshow");

    h.view.show_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Hidden);
    assert!(h.view.is_hidden());
    let log = h.dom.event_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].default_prevented);
    assert!(h.dom.has_class(h.root(), class::PANE_HIDDEN));

    veto.set(false);
    h.view.show_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Shown);
}

#[test]
fn vetoed_hide_stays_shown() {
    let mut h = Harness::new(SplitViewOptions::default().hidden(false));
    let _veto = h.veto("beforehide");
    h.view.hide_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Shown);
    assert_eq!(h.dom.event_names(), vec!["beforehide"]);
}

#[test]
fn events_bubble_to_ancestors() {
    let mut h = Harness::new(SplitViewOptions::default());
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let body = h.dom.body();
    h.dom
        .add_event_listener(body, "aftershow", move |_| counter.set(counter.get() + 1));

    h.view.show_pane();
    h.settle();
    assert_eq!(seen.get(), 1);
    assert!(h.dom.event_log().iter().all(|e| e.target == h.root()));
}

#[test]
fn hide_requested_while_showing_runs_after() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.view.show_pane();
    h.frames_until(|s| matches!(s, PaneState::Showing { .. }));

    h.view.hide_pane();
    assert!(h.view.is_hidden());
    assert_eq!(h.view.state(), PaneState::Showing { hide_pending: true });

    h.settle();
    assert_eq!(h.view.state(), PaneState::Hidden);
    assert_eq!(
        h.dom.event_names(),
        vec!["beforeshow", "aftershow", "beforehide", "afterhide"]
    );
}

#[test]
fn last_request_while_animating_wins() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.view.show_pane();
    h.frames_until(|s| matches!(s, PaneState::Showing { .. }));

    h.view.hide_pane();
    h.view.show_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Shown);
    assert_eq!(h.dom.event_names(), vec!["beforeshow", "aftershow"]);
}

#[test]
fn animation_runs_its_full_duration() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.view.show_pane();
    h.frame();
    let started = h.now();
    assert!(h.dom.is_animating());

    h.frames_until(|s| s == PaneState::Shown);
    assert!(h.now() - started >= Duration::from_millis(367));
    assert!(!h.dom.is_animating());
}

#[test]
fn watchdog_completes_without_transition_ends() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.dom.set_transition_ends_delivered(false);
    h.view.show_pane();
    h.frame();
    let started = h.now();

    h.settle();
    assert_eq!(h.view.state(), PaneState::Shown);
    assert!(h.now() - started >= Duration::from_millis(367 + 50));
    assert_eq!(h.dom.event_names(), vec!["beforeshow", "aftershow"]);
}

#[test]
fn zero_factor_skips_motion() {
    let mut h = Harness::with_config(SplitViewConfig {
        animation: AnimationConfig {
            factor: 0.0,
            ..AnimationConfig::default()
        },
        ..SplitViewConfig::default()
    });
    h.view.show_pane();
    h.frame();
    let started = h.now();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Shown);
    assert!(h.now() - started < Duration::from_millis(367));
}

#[test]
fn playback_overrides_are_cleared() {
    let mut h = Harness::new(SplitViewOptions::default().display_mode(DisplayMode::Inline));
    let parts = *h.view.parts();
    h.view.show_pane();
    h.frame();
    assert_eq!(h.dom.style(parts.pane_wrapper, StyleProp::Position), "absolute");
    assert_eq!(h.dom.style(parts.content, StyleProp::Left), "48px");

    h.settle();
    for el in [parts.pane_wrapper, parts.content, parts.pane] {
        for prop in StyleProp::ALL {
            assert_eq!(h.dom.style(el, prop), "", "{prop:?} left on {el}");
        }
    }
    assert_eq!(
        h.dom.offset_position(parts.content, parts.root),
        Position::new(328.0, 0.0)
    );
}

#[test]
fn inline_content_jumps_after_delay() {
    let mut h = Harness::new(SplitViewOptions::default().display_mode(DisplayMode::Inline));
    let content = h.view.content_element();
    h.view.show_pane();
    h.frame();
    let started = h.now();

    while h.now() - started < Duration::from_millis(350) {
        assert_eq!(h.dom.style(content, StyleProp::Left), "48px");
        h.frame();
    }
    assert_eq!(h.dom.style(content, StyleProp::Left), "328px");
    assert_eq!(h.dom.running_transitions(content), 1);
}

#[test]
fn inline_content_jumps_after_delay_on_hide() {
    let mut h = Harness::new(SplitViewOptions::default().display_mode(DisplayMode::Inline));
    let content = h.view.content_element();
    h.view.show_pane();
    h.settle();

    h.view.hide_pane();
    h.frame();
    let started = h.now();

    while h.now() - started < Duration::from_millis(267) {
        assert_eq!(h.dom.style(content, StyleProp::Left), "328px");
        h.frame();
    }
    assert_eq!(h.dom.style(content, StyleProp::Left), "48px");
    assert_eq!(h.dom.style(content, StyleProp::Width), "752px");
    assert!(matches!(h.view.state(), PaneState::Hiding { .. }));
}

#[test]
fn pane_decelerates_into_place() {
    let mut h = Harness::new(SplitViewOptions::default());
    let wrapper = h.view.parts().pane_wrapper;
    h.view.show_pane();
    h.frame();
    let started = h.now();

    let offset_at = |ms: u64| match h.dom.animated_value(
        wrapper,
        TransitionProperty::Transform,
        started + Duration::from_millis(ms),
    ) {
        Some(AnimatedProperty::Transform(t)) => t.offset_along(Axis::Horizontal),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(offset_at(0), -280.0);
    assert!(offset_at(92) > -112.0, "got {}", offset_at(92));
    assert_eq!(offset_at(367), 0.0);
}

#[test]
fn dispose_mid_animation() {
    let mut h = Harness::new(SplitViewOptions::default());
    let parts = *h.view.parts();
    h.view.show_pane();
    h.frames_until(|s| matches!(s, PaneState::Showing { .. }));

    h.view.dispose();
    assert_eq!(h.view.state(), PaneState::Disposed);
    assert!(!h.view.is_hidden());
    assert_eq!(h.dom.dispose_count(parts.pane), 1);
    assert_eq!(h.dom.dispose_count(parts.content), 1);

    h.view.dispose();
    assert_eq!(h.dom.dispose_count(parts.pane), 1);

    h.view.show_pane();
    h.view.hide_pane();
    for _ in 0..60 {
        h.frame();
    }
    assert_eq!(h.dom.event_names(), vec!["beforeshow"]);
    assert!(h.view.is_idle());
}

#[test]
fn invalid_option_value_changes_nothing() {
    let mut h = Harness::new(SplitViewOptions::default().hidden(false));
    let before = h.dom.mutation_count();
    assert!(!h.view.set_placement_value("sideways"));
    assert!(!h.view.set_display_mode_value("floating"));
    assert_eq!(h.view.placement(), Placement::Left);
    assert_eq!(h.view.display_mode(), DisplayMode::Overlay);
    assert_eq!(h.dom.mutation_count(), before);
}

#[test]
fn layout_change_waits_for_animation() {
    let mut h = Harness::new(SplitViewOptions::default());
    let root = h.root();
    h.view.show_pane();
    h.frames_until(|s| matches!(s, PaneState::Showing { .. }));

    h.view.set_placement(Placement::Right);
    assert_eq!(h.view.placement(), Placement::Right);
    assert!(h.dom.has_class(root, class::PLACEMENT_LEFT));

    h.settle();
    assert!(h.dom.has_class(root, class::PLACEMENT_RIGHT));
    assert!(!h.dom.has_class(root, class::PLACEMENT_LEFT));
}

#[test]
fn layout_change_at_rest_renders_immediately() {
    let mut h = Harness::new(SplitViewOptions::default().hidden(false));
    let root = h.root();
    h.view.set_display_mode(DisplayMode::Inline);
    assert!(h.dom.has_class(root, class::INLINE_MODE));
    assert!(!h.dom.has_class(root, class::OVERLAY_MODE));
    assert_eq!(
        h.dom
            .style(h.view.parts().pane_placeholder, StyleProp::Width),
        ""
    );
    h.settle();
    assert!(h.dom.event_names().is_empty());
}

#[test]
fn three_rapid_toggles_end_hidden() {
    let mut h = Harness::new(SplitViewOptions::default());
    h.view.show_pane();
    h.frames_until(|s| matches!(s, PaneState::Showing { .. }));

    h.view.hide_pane();
    h.view.show_pane();
    h.view.hide_pane();
    h.settle();
    assert_eq!(h.view.state(), PaneState::Hidden);
    assert_eq!(
        h.dom.event_names(),
        vec!["beforeshow", "aftershow", "beforehide", "afterhide"]
    );
}
