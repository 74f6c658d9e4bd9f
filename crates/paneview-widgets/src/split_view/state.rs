#![forbid(unsafe_code)]

//! The pane state machine as a pure transition function.
//!
//! [`step`] maps `(PaneState, Input)` to the next state plus the effects the
//! controller must carry out. Nothing here touches elements or time, so every
//! sequence can be checked without a surface.
//!
//! State machine:
//!
//! ```text
//! Initializing --Attached--> Hidden | Shown
//! Hidden --ShowRequested--> RequestingShow --allowed--> Showing --finished--> Shown
//!                                          --vetoed---> Hidden
//! Shown --HideRequested--> RequestingHide --allowed--> Hiding --finished--> Hidden
//!                                         --vetoed---> Shown
//! * --Dispose--> Disposed
//! ```
//!
//! # Invariants
//!
//! - Exactly one state is active. `entered` marks a change of state, at which
//!   point the previous state's scope is cancelled before any effect runs.
//! - A request made while `Showing` or `Hiding` never interrupts the running
//!   animation; it only sets the pending flag. The last request wins.
//! - A rest state entered with a pending flag immediately re-issues the
//!   opposite request through `follow_up`.
//! - `Disposed` absorbs every input.

use smallvec::{SmallVec, smallvec};

/// Active state of a split view's pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneState {
    /// Waiting for the root to be attached to a live document.
    Initializing { hidden: bool },
    Hidden,
    /// `beforeshow` is pending.
    RequestingShow,
    /// The show animation is running.
    Showing { hide_pending: bool },
    Shown,
    /// `beforehide` is pending.
    RequestingHide,
    /// The hide animation is running.
    Hiding { show_pending: bool },
    Disposed,
}

impl PaneState {
    /// Whether the pane counts as hidden in this state.
    ///
    /// While animating, this reflects the pending request rather than the
    /// direction of the animation.
    pub const fn hidden(&self) -> bool {
        match *self {
            Self::Initializing { hidden } => hidden,
            Self::Hidden | Self::RequestingShow => true,
            Self::Showing { hide_pending } => hide_pending,
            Self::Shown | Self::RequestingHide => false,
            Self::Hiding { show_pending } => !show_pending,
            Self::Disposed => false,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initializing { .. } => "Initializing",
            Self::Hidden => "Hidden",
            Self::RequestingShow => "RequestingShow",
            Self::Showing { .. } => "Showing",
            Self::Shown => "Shown",
            Self::RequestingHide => "RequestingHide",
            Self::Hiding { .. } => "Hiding",
            Self::Disposed => "Disposed",
        }
    }

    /// `Hidden` or `Shown`: no event or animation is outstanding.
    pub const fn is_at_rest(&self) -> bool {
        matches!(self, Self::Hidden | Self::Shown)
    }
}

/// Something that happened to the split view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The root joined a live document.
    Attached,
    ShowRequested,
    HideRequested,
    /// `beforeshow` returned; `true` unless a listener vetoed it.
    BeforeShowDecided(bool),
    /// `beforehide` returned; `true` unless a listener vetoed it.
    BeforeHideDecided(bool),
    /// The running show or hide playback settled.
    TransitionFinished,
    /// Placement or display mode changed.
    LayoutChanged,
    Dispose,
}

/// Non-cancelable lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    AfterShow,
    AfterHide,
}

impl Announcement {
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::AfterShow => "aftershow",
            Self::AfterHide => "afterhide",
        }
    }
}

/// Work the controller performs after a step, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Read the root's writing direction.
    DetectDirection,
    /// Switch the rendered shown/hidden arrangement.
    SetShownMode(bool),
    /// Bring elements in line with the current configuration.
    Render,
    /// Defer dispatch of `beforeshow`.
    RequestBeforeShow,
    /// Defer dispatch of `beforehide`.
    RequestBeforeHide,
    /// Defer the show playback.
    PlayShow,
    /// Defer the hide playback.
    PlayHide,
    Announce(Announcement),
    /// Cancel all outstanding work and dispose owned elements.
    ReleaseResources,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: PaneState,
    /// Whether `next` is a newly entered state.
    pub entered: bool,
    pub effects: SmallVec<[Effect; 4]>,
    /// Input to feed immediately after the effects have run.
    pub follow_up: Option<Input>,
}

impl Step {
    fn stay(state: PaneState) -> Self {
        Self {
            next: state,
            entered: false,
            effects: SmallVec::new(),
            follow_up: None,
        }
    }

    fn enter(state: PaneState, effects: SmallVec<[Effect; 4]>) -> Self {
        Self {
            next: state,
            entered: true,
            effects,
            follow_up: None,
        }
    }

    fn then(mut self, follow_up: Option<Input>) -> Self {
        self.follow_up = follow_up;
        self
    }

    /// Whether the step changed nothing at all.
    pub fn is_noop(&self, from: PaneState) -> bool {
        !self.entered && self.effects.is_empty() && self.next == from
    }
}

/// Apply `input` to `state`.
pub fn step(state: PaneState, input: Input) -> Step {
    use Effect as E;
    use Input as I;
    use PaneState as S;

    match (state, input) {
        (S::Disposed, _) => Step::stay(S::Disposed),
        (_, I::Dispose) => Step::enter(S::Disposed, smallvec![E::ReleaseResources]),

        (S::Initializing { .. }, I::ShowRequested) => Step::stay(S::Initializing { hidden: false }),
        (S::Initializing { .. }, I::HideRequested) => Step::stay(S::Initializing { hidden: true }),
        (S::Initializing { hidden }, I::Attached) => Step::enter(
            if hidden { S::Hidden } else { S::Shown },
            smallvec![E::DetectDirection, E::SetShownMode(!hidden), E::Render],
        ),

        (S::Hidden | S::RequestingShow | S::Shown | S::RequestingHide, I::LayoutChanged) => Step {
            effects: smallvec![E::Render],
            ..Step::stay(state)
        },

        (S::Hidden, I::ShowRequested) => {
            Step::enter(S::RequestingShow, smallvec![E::RequestBeforeShow])
        }
        (S::RequestingShow, I::BeforeShowDecided(true)) => Step::enter(
            S::Showing {
                hide_pending: false,
            },
            smallvec![E::PlayShow],
        ),
        (S::RequestingShow, I::BeforeShowDecided(false)) => Step::enter(S::Hidden, SmallVec::new()),

        (S::Showing { .. }, I::ShowRequested) => Step::stay(S::Showing {
            hide_pending: false,
        }),
        (S::Showing { .. }, I::HideRequested) => Step::stay(S::Showing { hide_pending: true }),
        (S::Showing { hide_pending }, I::TransitionFinished) => Step::enter(
            S::Shown,
            smallvec![E::Announce(Announcement::AfterShow), E::Render],
        )
        .then(hide_pending.then_some(I::HideRequested)),

        (S::Shown, I::HideRequested) => {
            Step::enter(S::RequestingHide, smallvec![E::RequestBeforeHide])
        }
        (S::RequestingHide, I::BeforeHideDecided(true)) => Step::enter(
            S::Hiding {
                show_pending: false,
            },
            smallvec![E::PlayHide],
        ),
        (S::RequestingHide, I::BeforeHideDecided(false)) => Step::enter(S::Shown, SmallVec::new()),

        (S::Hiding { .. }, I::ShowRequested) => Step::stay(S::Hiding { show_pending: true }),
        (S::Hiding { .. }, I::HideRequested) => Step::stay(S::Hiding {
            show_pending: false,
        }),
        (S::Hiding { show_pending }, I::TransitionFinished) => Step::enter(
            S::Hidden,
            smallvec![
                E::SetShownMode(false),
                E::Render,
                E::Announce(Announcement::AfterHide),
                E::Render
            ],
        )
        .then(show_pending.then_some(I::ShowRequested)),

        // Stale completions and requests already satisfied.
        (state, _) => Step::stay(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL_STATES: [PaneState; 11] = [
        PaneState::Initializing { hidden: true },
        PaneState::Initializing { hidden: false },
        PaneState::Hidden,
        PaneState::RequestingShow,
        PaneState::Showing {
            hide_pending: false,
        },
        PaneState::Showing { hide_pending: true },
        PaneState::Shown,
        PaneState::RequestingHide,
        PaneState::Hiding {
            show_pending: false,
        },
        PaneState::Hiding { show_pending: true },
        PaneState::Disposed,
    ];

    const ALL_INPUTS: [Input; 10] = [
        Input::Attached,
        Input::ShowRequested,
        Input::HideRequested,
        Input::BeforeShowDecided(true),
        Input::BeforeShowDecided(false),
        Input::BeforeHideDecided(true),
        Input::BeforeHideDecided(false),
        Input::TransitionFinished,
        Input::LayoutChanged,
        Input::Dispose,
    ];

    /// Feed inputs, following up like the controller does, and collect the
    /// visited state names.
    fn run(mut state: PaneState, inputs: &[Input]) -> (PaneState, Vec<&'static str>) {
        let mut visited = Vec::new();
        for &input in inputs {
            let mut next = Some(input);
            while let Some(input) = next {
                let s = step(state, input);
                if s.entered {
                    visited.push(s.next.name());
                }
                state = s.next;
                next = s.follow_up;
            }
        }
        (state, visited)
    }

    #[test]
    fn full_cycle() {
        let (state, visited) = run(
            PaneState::Initializing { hidden: true },
            &[
                Input::Attached,
                Input::ShowRequested,
                Input::BeforeShowDecided(true),
                Input::TransitionFinished,
                Input::HideRequested,
                Input::BeforeHideDecided(true),
                Input::TransitionFinished,
            ],
        );
        assert_eq!(state, PaneState::Hidden);
        assert_eq!(
            visited,
            vec![
                "Hidden",
                "RequestingShow",
                "Showing",
                "Shown",
                "RequestingHide",
                "Hiding",
                "Hidden"
            ]
        );
    }

    #[test]
    fn attach_honors_construction_intent() {
        let s = step(PaneState::Initializing { hidden: true }, Input::ShowRequested);
        assert_eq!(s.next, PaneState::Initializing { hidden: false });
        assert!(!s.entered);

        let s = step(s.next, Input::Attached);
        assert_eq!(s.next, PaneState::Shown);
        assert_eq!(
            s.effects.as_slice(),
            &[Effect::DetectDirection, Effect::SetShownMode(true), Effect::Render]
        );
    }

    #[test]
    fn hidden_flag_per_state() {
        assert!(PaneState::Hidden.hidden());
        assert!(PaneState::RequestingShow.hidden());
        assert!(!PaneState::Shown.hidden());
        assert!(!PaneState::RequestingHide.hidden());
        assert!(!PaneState::Showing { hide_pending: false }.hidden());
        assert!(PaneState::Showing { hide_pending: true }.hidden());
        assert!(PaneState::Hiding { show_pending: false }.hidden());
        assert!(!PaneState::Hiding { show_pending: true }.hidden());
        assert!(!PaneState::Disposed.hidden());
    }

    #[test]
    fn repeated_show_is_single_transition() {
        let s = step(PaneState::Hidden, Input::ShowRequested);
        assert_eq!(s.effects.as_slice(), &[Effect::RequestBeforeShow]);
        let again = step(s.next, Input::ShowRequested);
        assert!(again.is_noop(s.next));
    }

    #[test]
    fn hide_during_show_is_deferred() {
        let s = step(PaneState::Showing { hide_pending: false }, Input::HideRequested);
        assert!(!s.entered, "the show animation keeps running");
        assert!(s.effects.is_empty());

        let done = step(s.next, Input::TransitionFinished);
        assert_eq!(done.next, PaneState::Shown);
        assert_eq!(
            done.effects.as_slice(),
            &[Effect::Announce(Announcement::AfterShow), Effect::Render]
        );
        assert_eq!(done.follow_up, Some(Input::HideRequested));
    }

    #[test]
    fn show_during_hide_reissues_after_hidden() {
        let (state, visited) = run(
            PaneState::Hiding { show_pending: false },
            &[Input::ShowRequested, Input::TransitionFinished],
        );
        assert_eq!(state, PaneState::RequestingShow);
        assert_eq!(visited, vec!["Hidden", "RequestingShow"]);
    }

    #[test]
    fn last_request_wins() {
        let (state, _) = run(
            PaneState::Showing { hide_pending: false },
            &[Input::HideRequested, Input::ShowRequested, Input::HideRequested],
        );
        assert_eq!(state, PaneState::Showing { hide_pending: true });

        let (state, _) = run(
            PaneState::Showing { hide_pending: false },
            &[Input::HideRequested, Input::ShowRequested],
        );
        assert_eq!(state, PaneState::Showing { hide_pending: false });
        let done = step(state, Input::TransitionFinished);
        assert_eq!(done.follow_up, None);
    }

    #[test]
    fn veto_returns_to_rest() {
        let s = step(PaneState::RequestingShow, Input::BeforeShowDecided(false));
        assert_eq!(s.next, PaneState::Hidden);
        assert!(s.effects.is_empty());
        let s = step(PaneState::RequestingHide, Input::BeforeHideDecided(false));
        assert_eq!(s.next, PaneState::Shown);
        assert_eq!(s.follow_up, None);
    }

    #[test]
    fn hiding_finish_renders_hidden_then_announces() {
        let s = step(PaneState::Hiding { show_pending: false }, Input::TransitionFinished);
        assert_eq!(
            s.effects.as_slice(),
            &[
                Effect::SetShownMode(false),
                Effect::Render,
                Effect::Announce(Announcement::AfterHide),
                Effect::Render
            ]
        );
    }

    #[test]
    fn layout_changes_render_only_when_not_animating() {
        for state in ALL_STATES {
            let s = step(state, Input::LayoutChanged);
            let renders = s.effects.as_slice() == [Effect::Render];
            let expected = matches!(
                state,
                PaneState::Hidden
                    | PaneState::Shown
                    | PaneState::RequestingShow
                    | PaneState::RequestingHide
            );
            assert_eq!(renders, expected, "{state:?}");
            assert_eq!(s.next, state);
        }
    }

    #[test]
    fn dispose_is_terminal() {
        for state in ALL_STATES {
            let s = step(state, Input::Dispose);
            assert_eq!(s.next, PaneState::Disposed);
            if state == PaneState::Disposed {
                assert!(s.is_noop(state), "second dispose does nothing");
            } else {
                assert_eq!(s.effects.as_slice(), &[Effect::ReleaseResources]);
            }
        }
        for input in ALL_INPUTS {
            assert!(step(PaneState::Disposed, input).is_noop(PaneState::Disposed));
        }
    }

    #[test]
    fn stale_inputs_are_ignored() {
        for state in [PaneState::Hidden, PaneState::Shown] {
            for input in [
                Input::TransitionFinished,
                Input::BeforeShowDecided(true),
                Input::BeforeHideDecided(true),
                Input::Attached,
            ] {
                assert!(step(state, input).is_noop(state), "{state:?} {input:?}");
            }
        }
    }

    #[test]
    fn every_pair_is_total() {
        for state in ALL_STATES {
            for input in ALL_INPUTS {
                let s = step(state, input);
                if !s.entered {
                    assert_eq!(s.next.name(), state.name(), "{state:?} {input:?}");
                }
            }
        }
    }
}
