#![forbid(unsafe_code)]

//! Show and hide playback.
//!
//! A playback is planned from geometry captured once, before any element is
//! pinned ([`PlaybackPlan::new`]), then run against the surface
//! ([`Playback::start`]). Planning is pure so the geometry rules can be
//! checked without a surface.
//!
//! During playback the pane wrapper and content are absolutely positioned at
//! their captured rectangles, the wrapper stacked above the content. Once
//! every transition settles the overrides are removed and the stylesheet
//! takes over again.
//!
//! # Invariants
//!
//! - `content_from` of a show equals `content_to` of the matching hide.
//! - Equal pane sizes produce [`PaneMotion::Still`]: nothing to wait for.
//! - Overlay mode never moves the content.

use paneview_backend::{ElementId, StyleProp, Surface, px};
use paneview_core::animation::Transform;
use paneview_core::cancellation::CancellationToken;
use paneview_core::geometry::{Axis, Rect, Thickness};
use smallvec::SmallVec;

use super::config::{DisplayMode, Placement};
use super::{Parts, SplitView, TARGET, Task};
use crate::animator::{Animator, TransitionId};
use crate::probe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayDirection {
    Show,
    Hide,
}

/// Geometry and layout captured at the start of a playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanInput {
    pub direction: PlayDirection,
    pub placement: Placement,
    pub display_mode: DisplayMode,
    pub rtl: bool,
    /// Pane wrapper in the shown arrangement, relative to the root.
    pub shown_pane: Rect,
    /// Content in the shown arrangement, relative to the root.
    pub shown_content: Rect,
    /// Pane wrapper thickness in the hidden arrangement.
    pub hidden_pane: Thickness,
}

/// What happens to the pane during a playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneMotion {
    Still,
    /// Clipper and pane start at full size, offset against each other by
    /// `diff`, and converge.
    Grow { to: f64, diff: f64 },
    /// Clipper and pane diverge by `diff`.
    Shrink { diff: f64 },
    /// Enter from `offset` along the axis.
    SlideIn { offset: f64 },
    /// Leave towards `offset` along the axis.
    SlideOut { offset: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackPlan {
    pub axis: Axis,
    /// Pane on the physical right or bottom edge.
    pub inverted: bool,
    /// Rectangle the pane wrapper is pinned to.
    pub pane: Rect,
    pub content_from: Rect,
    pub content_to: Rect,
    pub motion: PaneMotion,
    /// Content jumps to `content_to` after a delay and fades in (inline only).
    pub fades_content: bool,
}

/// Content rectangle in the hidden arrangement, derived from the shown one.
pub fn hidden_content_rect(input: &PlanInput) -> Rect {
    match input.display_mode {
        DisplayMode::Overlay => input.shown_content,
        DisplayMode::Inline => {
            let axis = input.placement.axis();
            let delta = input.shown_pane.thickness(axis).total - input.hidden_pane.total;
            let shift = if input.placement.is_trailing(input.rtl) {
                0.0
            } else {
                -delta
            };
            input.shown_content.resized(axis, delta).shifted(axis, shift)
        }
    }
}

fn resize_motion(from: f64, to: f64, inverted: bool) -> PaneMotion {
    if to > from {
        let diff = if inverted { to - from } else { from - to };
        PaneMotion::Grow { to, diff }
    } else if to < from {
        let diff = if inverted { from - to } else { to - from };
        PaneMotion::Shrink { diff }
    } else {
        PaneMotion::Still
    }
}

impl PlaybackPlan {
    #[must_use]
    pub fn new(input: &PlanInput) -> Self {
        let axis = input.placement.axis();
        let inverted = input.placement.is_trailing(input.rtl);
        let shown = input.shown_pane.thickness(axis).content;
        let hidden = input.hidden_pane.content;
        let hidden_content = hidden_content_rect(input);
        let peeking = input.hidden_pane.is_visible();
        let offset = if inverted { shown } else { -shown };

        let (content_from, content_to, motion) = match input.direction {
            PlayDirection::Show => (
                hidden_content,
                input.shown_content,
                if peeking {
                    resize_motion(hidden, shown, inverted)
                } else {
                    PaneMotion::SlideIn { offset }
                },
            ),
            PlayDirection::Hide => (
                input.shown_content,
                hidden_content,
                if peeking {
                    resize_motion(shown, hidden, inverted)
                } else {
                    PaneMotion::SlideOut { offset }
                },
            ),
        };

        Self {
            axis,
            inverted,
            pane: input.shown_pane,
            content_from,
            content_to,
            motion,
            fades_content: input.display_mode == DisplayMode::Inline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeStage {
    NotNeeded,
    Waiting,
    Running,
}

/// A running show or hide.
#[derive(Debug)]
pub struct Playback {
    transitions: SmallVec<[TransitionId; 4]>,
    fade: FadeStage,
    content_to: Rect,
}

impl Playback {
    /// Pin the wrapper and content, then start the pane motion.
    pub fn start<S: Surface + ?Sized>(
        surface: &mut S,
        animator: &mut Animator,
        parts: &Parts,
        plan: &PlaybackPlan,
        token: &CancellationToken,
    ) -> Self {
        let wrapper = parts.pane_wrapper;
        surface.set_style(wrapper, StyleProp::Position, "absolute");
        surface.set_style(wrapper, StyleProp::ZIndex, "1");
        surface.set_style(wrapper, StyleProp::Left, &px(plan.pane.left));
        surface.set_style(wrapper, StyleProp::Top, &px(plan.pane.top));
        surface.set_style(wrapper, StyleProp::Height, &px(plan.pane.content_height));
        surface.set_style(wrapper, StyleProp::Width, &px(plan.pane.content_width));

        surface.set_style(parts.content, StyleProp::Position, "absolute");
        surface.set_style(parts.content, StyleProp::ZIndex, "0");
        set_rect(surface, parts.content, plan.content_from);

        let axis = plan.axis;
        let size = match axis {
            Axis::Horizontal => StyleProp::Width,
            Axis::Vertical => StyleProp::Height,
        };
        let mut transitions = SmallVec::new();
        match plan.motion {
            PaneMotion::Still => {}
            PaneMotion::Grow { to, diff } => {
                surface.set_style(wrapper, size, &px(to));
                surface.set_style(wrapper, StyleProp::Transform, &Transform::Translate(axis, diff).to_css());
                surface.set_style(parts.pane, size, &px(to));
                surface.set_style(
                    parts.pane,
                    StyleProp::Transform,
                    &Transform::Translate(axis, -diff).to_css(),
                );
                surface.resolve_styles(wrapper);
                surface.resolve_styles(parts.pane);
                transitions.push(animator.transform_to(surface, wrapper, Transform::None, token.clone()));
                transitions.push(animator.transform_to(surface, parts.pane, Transform::None, token.clone()));
            }
            PaneMotion::Shrink { diff } => {
                surface.set_style(wrapper, StyleProp::Transform, "");
                surface.set_style(parts.pane, StyleProp::Transform, "");
                surface.resolve_styles(wrapper);
                surface.resolve_styles(parts.pane);
                transitions.push(animator.transform_to(
                    surface,
                    wrapper,
                    Transform::Translate(axis, diff),
                    token.clone(),
                ));
                transitions.push(animator.transform_to(
                    surface,
                    parts.pane,
                    Transform::Translate(axis, -diff),
                    token.clone(),
                ));
            }
            PaneMotion::SlideIn { offset } => {
                transitions.push(animator.slide_in(
                    surface,
                    wrapper,
                    Transform::Translate(axis, offset),
                    token.clone(),
                ));
            }
            PaneMotion::SlideOut { offset } => {
                transitions.push(animator.slide_out(
                    surface,
                    wrapper,
                    Transform::Translate(axis, offset),
                    token.clone(),
                ));
            }
        }

        Self {
            transitions,
            fade: if plan.fades_content {
                FadeStage::Waiting
            } else {
                FadeStage::NotNeeded
            },
            content_to: plan.content_to,
        }
    }

    /// Move the content to its final rectangle and fade it in.
    pub fn start_fade<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        animator: &mut Animator,
        parts: &Parts,
        token: &CancellationToken,
    ) {
        if self.fade != FadeStage::Waiting {
            return;
        }
        set_rect(surface, parts.content, self.content_to);
        self.transitions
            .push(animator.fade_in(surface, parts.content, token.clone()));
        self.fade = FadeStage::Running;
    }

    pub fn is_settled(&self, animator: &Animator) -> bool {
        self.fade != FadeStage::Waiting && animator.all_settled(&self.transitions)
    }
}

fn set_rect<S: Surface + ?Sized>(surface: &mut S, el: ElementId, rect: Rect) {
    surface.set_style(el, StyleProp::Left, &px(rect.left));
    surface.set_style(el, StyleProp::Top, &px(rect.top));
    surface.set_style(el, StyleProp::Height, &px(rect.content_height));
    surface.set_style(el, StyleProp::Width, &px(rect.content_width));
}

/// Remove every inline override a playback wrote.
pub fn clear_overrides<S: Surface + ?Sized>(surface: &mut S, parts: &Parts) {
    const PINNED: [StyleProp; 7] = [
        StyleProp::Position,
        StyleProp::ZIndex,
        StyleProp::Left,
        StyleProp::Top,
        StyleProp::Height,
        StyleProp::Width,
        StyleProp::Transform,
    ];
    for el in [parts.pane_wrapper, parts.content] {
        for prop in PINNED {
            surface.set_style(el, prop, "");
        }
    }
    for prop in [StyleProp::Height, StyleProp::Width, StyleProp::Transform] {
        surface.set_style(parts.pane, prop, "");
    }
}

impl<S: Surface> SplitView<S> {
    pub(super) fn start_playback(&mut self, direction: PlayDirection, hidden: Thickness) {
        let root = self.parts.root;
        let input = PlanInput {
            direction,
            placement: self.placement,
            display_mode: self.display_mode,
            rtl: self.rtl,
            shown_pane: probe::measure(&self.surface, self.parts.pane_wrapper, root),
            shown_content: probe::measure(&self.surface, self.parts.content, root),
            hidden_pane: hidden,
        };
        let plan = PlaybackPlan::new(&input);
        tracing::debug!(target: TARGET, ?direction, motion = ?plan.motion, "playback started");

        let token = self.scope.token();
        let playback = Playback::start(
            &mut self.surface,
            &mut self.animator,
            &self.parts,
            &plan,
            &token,
        );
        if plan.fades_content {
            let delay = match direction {
                PlayDirection::Show => self.animation.show_fade_delay(),
                PlayDirection::Hide => self.animation.hide_fade_delay(),
            };
            self.scheduler.defer_after(delay, token, Task::FadeContent);
        }
        self.playback = Some(playback);
    }

    pub(super) fn fade_content(&mut self) {
        let token = self.scope.token();
        if let Some(playback) = self.playback.as_mut() {
            playback.start_fade(&mut self.surface, &mut self.animator, &self.parts, &token);
        }
    }

    /// Finish the playback if it settled. Returns whether it did.
    pub(super) fn poll_playback(&mut self) -> bool {
        let settled = self
            .playback
            .as_ref()
            .is_some_and(|p| p.is_settled(&self.animator));
        if !settled {
            return false;
        }
        self.playback = None;
        clear_overrides(&mut self.surface, &self.parts);
        self.handle(super::Input::TransitionFinished);
        true
    }
}
