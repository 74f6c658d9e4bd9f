//! Property tests tying playback planning to the resulting layout.
//!
//! A hide plan derives the hidden content rectangle from the shown layout
//! alone. Whatever the placement, direction and pane sizes, that derivation
//! must agree with where the stylesheet actually puts the content once the
//! pane is hidden, or the content would visibly jump when the playback's
//! overrides are removed.

use std::time::Duration;

use paneview_backend::{Direction, Surface};
use paneview_core::geometry::{Position, Size, Thickness};
use paneview_web::MemoryDom;
use paneview_widgets::probe;
use paneview_widgets::split_view::{
    DisplayMode, PaneState, Placement, PlanInput, PlayDirection, PlaybackPlan, SplitView,
    SplitViewOptions, SplitViewStylesheet,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct Scenario {
    placement: Placement,
    display_mode: DisplayMode,
    rtl: bool,
    size: Size,
    shown: Thickness,
    hidden: Thickness,
}

fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    (
        prop::sample::select(Placement::ALL.to_vec()),
        prop::sample::select(DisplayMode::ALL.to_vec()),
        any::<bool>(),
        (400u32..1600, 400u32..1200),
        (100u32..300, 0u32..12),
        prop_oneof![Just(None), (1u32..80, 0u32..12).prop_map(Some)],
    )
        .prop_map(|(placement, display_mode, rtl, (w, h), (shown, chrome), hidden)| {
            let hidden = match hidden {
                Some((content, chrome)) => {
                    Thickness::new(f64::from(content), f64::from(content + chrome))
                }
                None => Thickness::ZERO,
            };
            Scenario {
                placement,
                display_mode,
                rtl,
                size: Size::new(f64::from(w), f64::from(h)),
                shown: Thickness::new(f64::from(shown), f64::from(shown + chrome)),
                hidden,
            }
        })
}

fn mount(s: &Scenario, hidden: bool) -> (MemoryDom, SplitView<MemoryDom>) {
    let mut dom = MemoryDom::new();
    dom.set_layout(SplitViewStylesheet::new(
        Position::new(0.0, 0.0),
        s.size,
        s.shown,
        s.hidden,
    ));
    let host = dom.create_element();
    let body = dom.body();
    dom.append_child(body, host);
    if s.rtl {
        dom.set_direction(host, Direction::Rtl);
    }
    let options = SplitViewOptions::default()
        .hidden(hidden)
        .placement(s.placement)
        .display_mode(s.display_mode);
    let mut view = SplitView::new(dom.clone(), host, options).unwrap();
    view.tick(Duration::ZERO);
    (dom, view)
}

fn plan_from_layout(
    dom: &MemoryDom,
    view: &SplitView<MemoryDom>,
    s: &Scenario,
    direction: PlayDirection,
) -> PlaybackPlan {
    let parts = view.parts();
    let hidden_wrapper = Thickness::new(s.hidden.total, s.hidden.total);
    PlaybackPlan::new(&PlanInput {
        direction,
        placement: s.placement,
        display_mode: s.display_mode,
        rtl: s.rtl,
        shown_pane: probe::measure(dom, parts.pane_wrapper, parts.root),
        shown_content: probe::measure(dom, parts.content, parts.root),
        hidden_pane: hidden_wrapper,
    })
}

proptest! {
    #[test]
    fn hide_plan_lands_on_hidden_layout(s in scenario_strategy()) {
        let (dom, mut view) = mount(&s, false);
        let plan = plan_from_layout(&dom, &view, &s, PlayDirection::Hide);

        view.hide_pane();
        for frame in 1..=120u64 {
            view.tick(Duration::from_millis(16 * frame));
        }
        prop_assert_eq!(view.state(), PaneState::Hidden);

        let parts = *view.parts();
        let landed = probe::measure(&dom, parts.content, parts.root);
        prop_assert_eq!(plan.content_to, landed);
    }

    #[test]
    fn show_starts_from_hidden_layout(s in scenario_strategy()) {
        let (dom, view) = mount(&s, false);
        let show = plan_from_layout(&dom, &view, &s, PlayDirection::Show);

        let (hidden_dom, hidden_view) = mount(&s, true);
        let parts = *hidden_view.parts();
        let hidden_content = probe::measure(&hidden_dom, parts.content, parts.root);
        prop_assert_eq!(show.content_from, hidden_content);
    }

    #[test]
    fn pane_motion_direction_matches_edge(s in scenario_strategy()) {
        let (dom, view) = mount(&s, false);
        let plan = plan_from_layout(&dom, &view, &s, PlayDirection::Hide);
        prop_assert_eq!(plan.inverted, s.placement.is_trailing(s.rtl));
        if s.display_mode == DisplayMode::Overlay {
            prop_assert_eq!(plan.content_from, plan.content_to);
        }
    }
}
