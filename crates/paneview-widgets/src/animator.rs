#![forbid(unsafe_code)]

//! Transition-driven element animation with guaranteed completion.
//!
//! This module provides:
//! - Transform and opacity transitions on single elements
//! - Slide-in / slide-out edge motion and content fade-in
//! - Joins over several transitions ([`Animator::all_settled`])
//! - A watchdog that settles transitions whose end is never reported
//!
//! The animator only writes styles; the host runs the actual transition and
//! reports its end through [`Animator::on_transition_end`]. Time reaches the
//! animator through [`Animator::advance`].
//!
//! # Invariants
//!
//! - Every transition settles: on its reported end, or once the host's clock
//!   passes `start + watchdog_grace + duration`.
//! - A settled transition no longer has an inline `transition` declaration.
//! - Durations are multiplied by the animation factor before use.
//!
//! # Failure Modes
//!
//! - A target value equal to the current one produces no host transition; the
//!   watchdog settles it.
//! - Transitions whose token was cancelled are dropped by
//!   [`Animator::purge_cancelled`] without touching styles, leaving the
//!   element mid-flight.

use std::time::Duration;

use paneview_backend::{ElementId, StyleProp, Surface};
use paneview_core::animation::{
    AnimatedProperty, EDGE_UI, Easing, Transform, TransitionProperty, TransitionSpec, scaled,
};
use paneview_core::cancellation::CancellationToken;

/// Nominal duration of edge UI motion and pane resizes.
pub const EDGE_UI_DURATION: Duration = Duration::from_millis(367);
/// Nominal duration of a content fade-in.
pub const FADE_IN_DURATION: Duration = Duration::from_millis(167);
/// Wait added on top of a transition's duration before the watchdog fires.
pub const WATCHDOG_GRACE: Duration = Duration::from_millis(50);

/// Handle to one running transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

/// Durations the animator applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorTimings {
    /// Global speed multiplier; `0.0` disables motion.
    pub factor: f64,
    pub edge_ui: Duration,
    pub fade_in: Duration,
    pub watchdog_grace: Duration,
}

impl Default for AnimatorTimings {
    fn default() -> Self {
        Self {
            factor: 1.0,
            edge_ui: EDGE_UI_DURATION,
            fade_in: FADE_IN_DURATION,
            watchdog_grace: WATCHDOG_GRACE,
        }
    }
}

#[derive(Debug)]
struct Running {
    id: TransitionId,
    el: ElementId,
    watchdog_at: Duration,
    token: CancellationToken,
    reset_opacity: bool,
}

/// Tracks in-flight transitions. See the [module docs](self).
#[derive(Debug)]
pub struct Animator {
    timings: AnimatorTimings,
    now: Duration,
    next_id: u64,
    running: Vec<Running>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimatorTimings::default())
    }
}

const fn style_of(property: TransitionProperty) -> StyleProp {
    match property {
        TransitionProperty::Transform => StyleProp::Transform,
        TransitionProperty::Opacity => StyleProp::Opacity,
    }
}

impl Animator {
    #[must_use]
    pub fn new(timings: AnimatorTimings) -> Self {
        Self {
            timings,
            now: Duration::ZERO,
            next_id: 0,
            running: Vec::new(),
        }
    }

    pub fn timings(&self) -> &AnimatorTimings {
        &self.timings
    }

    /// Host time last passed to [`advance`](Self::advance).
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Transition `el` to `target` over `duration` (before scaling).
    pub fn run<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        el: ElementId,
        target: AnimatedProperty,
        duration: Duration,
        easing: Easing,
        token: CancellationToken,
    ) -> TransitionId {
        let duration = scaled(duration, self.timings.factor);
        let spec = TransitionSpec::new(target.property(), duration, easing);
        surface.set_style(el, StyleProp::Transition, &spec.to_css());
        surface.set_style(el, style_of(target.property()), &target.to_css());

        self.next_id += 1;
        let id = TransitionId(self.next_id);
        self.running.push(Running {
            id,
            el,
            watchdog_at: self
                .now
                .saturating_add(self.timings.watchdog_grace)
                .saturating_add(duration),
            token,
            reset_opacity: false,
        });
        id
    }

    /// Move `el` to `target` with the edge UI curve.
    pub fn transform_to<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        el: ElementId,
        target: Transform,
        token: CancellationToken,
    ) -> TransitionId {
        self.run(
            surface,
            el,
            AnimatedProperty::Transform(target),
            self.timings.edge_ui,
            EDGE_UI,
            token,
        )
    }

    /// Jump `el` to `offset`, then animate it back to its resting position.
    pub fn slide_in<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        el: ElementId,
        offset: Transform,
        token: CancellationToken,
    ) -> TransitionId {
        surface.set_style(el, StyleProp::Transition, "");
        surface.set_style(el, StyleProp::Transform, &offset.to_css());
        surface.resolve_styles(el);
        self.transform_to(surface, el, Transform::None, token)
    }

    /// Animate `el` from its resting position to `offset`.
    pub fn slide_out<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        el: ElementId,
        offset: Transform,
        token: CancellationToken,
    ) -> TransitionId {
        surface.set_style(el, StyleProp::Transition, "");
        surface.set_style(el, StyleProp::Transform, &Transform::None.to_css());
        surface.resolve_styles(el);
        self.transform_to(surface, el, offset, token)
    }

    /// Fade `el` from transparent to opaque; the opacity override is removed
    /// once the fade settles.
    pub fn fade_in<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        el: ElementId,
        token: CancellationToken,
    ) -> TransitionId {
        surface.set_style(el, StyleProp::Transition, "");
        surface.set_style(el, StyleProp::Opacity, "0");
        surface.resolve_styles(el);
        let id = self.run(
            surface,
            el,
            AnimatedProperty::Opacity(1.0),
            self.timings.fade_in,
            Easing::Linear,
            token,
        );
        if let Some(running) = self.running.last_mut() {
            running.reset_opacity = true;
        }
        id
    }

    /// Settle the oldest live transition on `el`. Returns `false` when `el`
    /// has none (e.g. it was cancelled).
    pub fn on_transition_end<S: Surface + ?Sized>(&mut self, surface: &mut S, el: ElementId) -> bool {
        let Some(index) = self
            .running
            .iter()
            .position(|r| r.el == el && !r.token.is_cancelled())
        else {
            return false;
        };
        self.settle(surface, index);
        true
    }

    /// Advance the clock and fire every expired watchdog.
    pub fn advance<S: Surface + ?Sized>(&mut self, surface: &mut S, now: Duration) {
        self.now = self.now.max(now);
        while let Some(index) = self
            .running
            .iter()
            .position(|r| r.watchdog_at <= self.now && !r.token.is_cancelled())
        {
            tracing::debug!(
                target: "paneview.animator",
                element = %self.running[index].el,
                "transition end never arrived; watchdog settled it"
            );
            self.settle(surface, index);
        }
    }

    /// Forget every transition whose scope was cancelled. Styles are left as
    /// they are.
    pub fn purge_cancelled(&mut self) -> usize {
        let before = self.running.len();
        self.running.retain(|r| !r.token.is_cancelled());
        before - self.running.len()
    }

    pub fn is_settled(&self, id: TransitionId) -> bool {
        !self.running.iter().any(|r| r.id == id)
    }

    /// Whether every transition in `ids` has settled. Empty joins are settled.
    pub fn all_settled(&self, ids: &[TransitionId]) -> bool {
        ids.iter().all(|id| self.is_settled(*id))
    }

    /// Number of transitions still running.
    pub fn in_flight(&self) -> usize {
        self.running.len()
    }

    /// Earliest pending watchdog deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.running
            .iter()
            .filter(|r| !r.token.is_cancelled())
            .map(|r| r.watchdog_at)
            .min()
    }

    fn settle<S: Surface + ?Sized>(&mut self, surface: &mut S, index: usize) {
        let done = self.running.remove(index);
        surface.set_style(done.el, StyleProp::Transition, "");
        if done.reset_opacity {
            surface.set_style(done.el, StyleProp::Opacity, "");
        }
    }
}
