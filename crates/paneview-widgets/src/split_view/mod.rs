#![forbid(unsafe_code)]

//! Collapsible pane next to arbitrary content.
//!
//! A [`SplitView`] takes over a host element: its first child becomes the
//! pane, every other child moves into a content element. The pane is shown
//! and hidden through a cancelable event / animation sequence driven by
//! [`state::step`].
//!
//! # Driving a split view
//!
//! The split view never reads a clock. The host calls [`SplitView::tick`] with
//! a monotonic time; each tick delivers transition ends, fires expired
//! watchdogs, releases due timers and runs deferred work. Requests such as
//! [`SplitView::show_pane`] only change state synchronously; the events and
//! animation they cause are observed from the next tick on.
//!
//! ```
//! use std::time::Duration;
//! use paneview_backend::Surface;
//! use paneview_web::MemoryDom;
//! use paneview_widgets::split_view::{SplitView, SplitViewOptions};
//!
//! let mut dom = MemoryDom::new();
//! let host = dom.create_element();
//! let body = dom.body();
//! dom.append_child(body, host);
//!
//! let mut view = SplitView::new(dom.clone(), host, SplitViewOptions::default()).unwrap();
//! view.tick(Duration::ZERO);
//! assert!(view.is_hidden());
//!
//! view.show_pane();
//! for frame in 0..60 {
//!     view.tick(Duration::from_millis(16 * frame));
//! }
//! assert_eq!(view.state_name(), "Shown");
//! ```
//!
//! # Invariants
//!
//! - At most one show or hide sequence is in flight.
//! - Leaving a state cancels its scope before the next state's effects run;
//!   deferred work of the old state is dropped unseen.
//! - Placement and display mode changes made mid-animation never alter the
//!   geometry that animation captured; they are rendered at the next rest
//!   or requesting state.
//!
//! # Failure Modes
//!
//! - Unknown option strings are ignored (logged at `debug`).
//! - A transition whose end is never reported is settled by the watchdog.
//! - Disposing mid-animation leaves elements wherever the animation stopped.

pub mod config;
pub mod render;
pub mod state;
pub mod stylesheet;
pub mod transition;

use std::time::Duration;

use paneview_backend::{Direction, DomEvent, ElementId, Surface};
use paneview_core::cancellation::CancellationSource;
use paneview_core::geometry::Thickness;
use paneview_core::scheduler::{Clock, Scheduler};

use crate::animator::Animator;
use crate::error::SplitViewError;

pub use config::{
    AnimationConfig, DisplayMode, ParseOptionError, Placement, SplitViewConfig, SplitViewOptions,
};
pub use render::{class, display_mode_class, placement_class};
pub use state::{Announcement, Effect, Input, PaneState};
pub use stylesheet::SplitViewStylesheet;
pub use transition::{PaneMotion, PlayDirection, PlaybackPlan, PlanInput};

use render::Rendered;
use transition::Playback;

const TARGET: &str = "paneview.split_view";

/// Cancelable event fired before the pane starts showing.
pub const BEFORE_SHOW: &str = "beforeshow";
/// Cancelable event fired before the pane starts hiding.
pub const BEFORE_HIDE: &str = "beforehide";

/// Elements owned by a split view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parts {
    /// The host element.
    pub root: ElementId,
    pub pane: ElementId,
    /// Clips the pane during resize animations. Has no margin, padding, or
    /// border.
    pub pane_wrapper: ElementId,
    /// Reserves the hidden pane's footprint while an overlay pane is shown.
    pub pane_placeholder: ElementId,
    pub content: ElementId,
}

impl Parts {
    fn build<S: Surface + ?Sized>(surface: &mut S, root: ElementId) -> Self {
        let pane = match surface.first_element_child(root) {
            Some(el) => el,
            None => surface.create_element(),
        };
        surface.add_class(pane, class::PANE);

        let content = surface.create_element();
        surface.add_class(content, class::CONTENT);
        for child in surface.children(root) {
            if child != pane {
                surface.append_child(content, child);
            }
        }

        let pane_wrapper = surface.create_element();
        surface.add_class(pane_wrapper, class::PANE_WRAPPER);
        surface.append_child(pane_wrapper, pane);

        let pane_placeholder = surface.create_element();
        surface.add_class(pane_placeholder, class::PANE_PLACEHOLDER);

        surface.add_class(root, class::SPLIT_VIEW);
        surface.add_class(root, class::DISPOSABLE);
        surface.add_class(root, class::PANE_HIDDEN);

        Self {
            root,
            pane,
            pane_wrapper,
            pane_placeholder,
            content,
        }
    }
}

/// Deferred work, always tagged with the scope of the state that queued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    FireBeforeShow,
    FireBeforeHide,
    BeginShow,
    BeginHide,
    FadeContent,
}

/// A collapsible pane control. See the [module docs](self).
#[derive(Debug)]
pub struct SplitView<S: Surface> {
    surface: S,
    parts: Parts,
    placement: Placement,
    display_mode: DisplayMode,
    rtl: bool,
    /// Whether the root carries the pane-shown class.
    shown_mode: bool,
    cached_hidden: Option<Thickness>,
    rendered: Rendered,
    state: PaneState,
    lifetime: CancellationSource,
    scope: CancellationSource,
    scheduler: Scheduler<Task>,
    animator: Animator,
    playback: Option<Playback>,
    animation: AnimationConfig,
}

impl<S: Surface> SplitView<S> {
    /// Bind a split view to `host`.
    ///
    /// # Errors
    ///
    /// [`SplitViewError::DuplicateConstruction`] if a control is already
    /// bound to `host`.
    pub fn new(surface: S, host: ElementId, options: SplitViewOptions) -> Result<Self, SplitViewError> {
        Self::with_config(
            surface,
            host,
            SplitViewConfig {
                options,
                ..SplitViewConfig::default()
            },
        )
    }

    /// Bind a split view to `host` with explicit animation timings.
    ///
    /// # Errors
    ///
    /// [`SplitViewError::DuplicateConstruction`] if a control is already
    /// bound to `host`.
    pub fn with_config(
        mut surface: S,
        host: ElementId,
        config: SplitViewConfig,
    ) -> Result<Self, SplitViewError> {
        if surface.is_control_host(host) {
            return Err(SplitViewError::DuplicateConstruction { host });
        }
        let parts = Parts::build(&mut surface, host);
        surface.mark_control_host(host);

        let options = config.options;
        tracing::debug!(
            target: TARGET,
            root = %host,
            placement = %options.placement,
            display_mode = %options.display_mode,
            hidden = options.hidden,
            "split view created"
        );

        let lifetime = CancellationSource::new();
        let scope = CancellationSource::child_of(&lifetime.token());
        Ok(Self {
            surface,
            parts,
            placement: options.placement,
            display_mode: options.display_mode,
            rtl: false,
            shown_mode: false,
            cached_hidden: None,
            rendered: Rendered::default(),
            state: PaneState::Initializing {
                hidden: options.hidden,
            },
            lifetime,
            scope,
            scheduler: Scheduler::new(),
            animator: Animator::new(config.animation.animator_timings()),
            playback: None,
            animation: config.animation,
        })
    }

    /// The host element.
    pub fn element(&self) -> ElementId {
        self.parts.root
    }

    pub fn pane_element(&self) -> ElementId {
        self.parts.pane
    }

    pub fn content_element(&self) -> ElementId {
        self.parts.content
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> PaneState {
        self.state
    }

    /// Name of the active state, for diagnostics.
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Whether the root was right-to-left when it was attached.
    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Move the pane to another edge. Rendered immediately unless an
    /// animation is running.
    pub fn set_placement(&mut self, placement: Placement) {
        if self.placement == placement {
            return;
        }
        self.placement = placement;
        self.cached_hidden = None;
        self.handle(Input::LayoutChanged);
    }

    /// String form of [`set_placement`](Self::set_placement). Unknown values
    /// are ignored; returns whether `value` was recognized.
    pub fn set_placement_value(&mut self, value: &str) -> bool {
        match value.parse::<Placement>() {
            Ok(placement) => {
                self.set_placement(placement);
                true
            }
            Err(err) => {
                tracing::debug!(target: TARGET, %err, "ignored placement value");
                false
            }
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Switch between overlay and inline. Rendered immediately unless an
    /// animation is running.
    pub fn set_display_mode(&mut self, display_mode: DisplayMode) {
        if self.display_mode == display_mode {
            return;
        }
        self.display_mode = display_mode;
        self.cached_hidden = None;
        self.handle(Input::LayoutChanged);
    }

    /// String form of [`set_display_mode`](Self::set_display_mode). Unknown
    /// values are ignored; returns whether `value` was recognized.
    pub fn set_display_mode_value(&mut self, value: &str) -> bool {
        match value.parse::<DisplayMode>() {
            Ok(mode) => {
                self.set_display_mode(mode);
                true
            }
            Err(err) => {
                tracing::debug!(target: TARGET, %err, "ignored display mode value");
                false
            }
        }
    }

    /// Apply a named option from markup-style configuration
    /// (`placement`, `displayMode`, `hidden`). Returns whether it was applied.
    pub fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name {
            "placement" => self.set_placement_value(value),
            "displayMode" | "display_mode" | "shownDisplayMode" => self.set_display_mode_value(value),
            "hidden" => match value {
                "true" => {
                    self.set_hidden(true);
                    true
                }
                "false" => {
                    self.set_hidden(false);
                    true
                }
                _ => {
                    tracing::debug!(target: TARGET, value, "ignored hidden value");
                    false
                }
            },
            _ => {
                tracing::debug!(target: TARGET, name, "ignored unknown option");
                false
            }
        }
    }

    /// Whether the pane is (or is about to be) hidden.
    pub fn is_hidden(&self) -> bool {
        self.state.hidden()
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.hide_pane();
        } else {
            self.show_pane();
        }
    }

    /// Request the pane be shown. Idempotent while shown or on the way.
    pub fn show_pane(&mut self) {
        self.handle(Input::ShowRequested);
    }

    /// Request the pane be hidden. Idempotent while hidden or on the way.
    pub fn hide_pane(&mut self) {
        self.handle(Input::HideRequested);
    }

    /// Cancel all work and dispose the pane and content subtrees. Later calls
    /// do nothing.
    pub fn dispose(&mut self) {
        if self.state == PaneState::Disposed {
            return;
        }
        self.handle(Input::Dispose);
    }

    /// Advance to host time `now` and run everything that became due.
    pub fn tick(&mut self, now: Duration) {
        if self.state == PaneState::Disposed {
            return;
        }
        for el in self.surface.drain_transition_ends(now) {
            self.animator.on_transition_end(&mut self.surface, el);
        }
        self.animator.advance(&mut self.surface, now);
        self.scheduler.advance_to(now);

        if matches!(self.state, PaneState::Initializing { .. })
            && self.surface.is_in_document(self.parts.root)
        {
            self.handle(Input::Attached);
        }

        loop {
            if self.poll_playback() {
                continue;
            }
            match self.scheduler.pop() {
                Some(task) => self.run_task(task),
                None => break,
            }
        }
    }

    /// [`tick`](Self::tick) at the time `clock` reports.
    pub fn tick_on(&mut self, clock: &impl Clock) {
        self.tick(clock.now());
    }

    /// Whether nothing is pending: the pane rests (or is disposed) and no
    /// deferred work or animation remains.
    pub fn is_idle(&self) -> bool {
        (self.state.is_at_rest() || self.state == PaneState::Disposed)
            && self.playback.is_none()
            && self.scheduler.is_idle()
    }

    /// Latest time by which the next tick makes progress on its own (a timer
    /// or watchdog), if anything is waiting on time.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.scheduler.next_deadline(), self.animator.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn handle(&mut self, input: Input) {
        let mut pending = Some(input);
        while let Some(input) = pending {
            let from = self.state;
            let step = state::step(from, input);
            if step.entered {
                self.exit_state();
                tracing::debug!(
                    target: TARGET,
                    from = from.name(),
                    to = step.next.name(),
                    input = ?input,
                    "state transition"
                );
            }
            self.state = step.next;
            for effect in step.effects {
                self.apply(effect);
            }
            pending = step.follow_up;
        }
    }

    fn exit_state(&mut self) {
        self.scope.cancel();
        self.playback = None;
        self.animator.purge_cancelled();
        self.scheduler.purge_cancelled();
        self.scope = CancellationSource::child_of(&self.lifetime.token());
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::DetectDirection => {
                self.rtl = self.surface.direction(self.parts.root) == Direction::Rtl;
                if self.rtl {
                    self.surface.add_class(self.parts.root, class::RTL);
                }
            }
            Effect::SetShownMode(shown) => self.shown_mode = shown,
            Effect::Render => self.render(),
            Effect::RequestBeforeShow => self.defer(Task::FireBeforeShow),
            Effect::RequestBeforeHide => self.defer(Task::FireBeforeHide),
            Effect::PlayShow => self.defer(Task::BeginShow),
            Effect::PlayHide => self.defer(Task::BeginHide),
            Effect::Announce(announcement) => {
                self.fire_event(announcement.event_name(), false);
            }
            Effect::ReleaseResources => {
                self.lifetime.cancel();
                self.playback = None;
                self.animator.purge_cancelled();
                self.scheduler.purge_cancelled();
                self.surface.dispose_subtree(self.parts.pane);
                self.surface.dispose_subtree(self.parts.content);
            }
        }
    }

    fn defer(&mut self, task: Task) {
        self.scheduler.defer(self.scope.token(), task);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::FireBeforeShow => {
                let allowed = self.fire_event(BEFORE_SHOW, true);
                self.handle(Input::BeforeShowDecided(allowed));
            }
            Task::FireBeforeHide => {
                let allowed = self.fire_event(BEFORE_HIDE, true);
                self.handle(Input::BeforeHideDecided(allowed));
            }
            Task::BeginShow => {
                self.cached_hidden = None;
                let hidden = self.hidden_thickness();
                self.shown_mode = true;
                self.render();
                self.start_playback(PlayDirection::Show, hidden);
            }
            Task::BeginHide => {
                let hidden = self.hidden_thickness();
                self.start_playback(PlayDirection::Hide, hidden);
            }
            Task::FadeContent => self.fade_content(),
        }
    }

    /// Dispatch on the root. Returns `false` if a listener vetoed it.
    fn fire_event(&mut self, name: &'static str, cancelable: bool) -> bool {
        let mut event = DomEvent::new(name, cancelable);
        let allowed = self.surface.dispatch_event(self.parts.root, &mut event);
        if !allowed {
            tracing::debug!(target: TARGET, event = name, "vetoed by listener");
        }
        allowed
    }
}
