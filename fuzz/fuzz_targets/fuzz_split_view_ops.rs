#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use paneview_backend::Surface;
use paneview_core::geometry::{Position, Size, Thickness};
use paneview_web::MemoryDom;
use paneview_widgets::split_view::{
    DisplayMode, PaneState, Placement, SplitView, SplitViewOptions, SplitViewStylesheet,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Show,
    Hide,
    Toggle,
    Placement(u8),
    DisplayMode(bool),
    Option(String, String),
    Tick(u8),
    Veto(bool),
    DropTransitionEnds(bool),
    Dispose,
}

#[derive(Debug, Arbitrary)]
struct Input {
    hidden: bool,
    peek: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }

    let mut dom = MemoryDom::new();
    let hidden_pane = if input.peek {
        Thickness::new(40.0, 48.0)
    } else {
        Thickness::ZERO
    };
    dom.set_layout(SplitViewStylesheet::new(
        Position::new(0.0, 0.0),
        Size::new(800.0, 600.0),
        Thickness::new(320.0, 328.0),
        hidden_pane,
    ));
    let host = dom.create_element();
    let body = dom.body();
    dom.append_child(body, host);

    let veto = std::rc::Rc::new(std::cell::Cell::new(false));
    for name in ["beforeshow", "beforehide"] {
        let veto = std::rc::Rc::clone(&veto);
        dom.add_event_listener(host, name, move |e| {
            if veto.get() {
                e.prevent_default();
            }
        });
    }

    let options = SplitViewOptions::default().hidden(input.hidden);
    let Ok(mut view) = SplitView::new(dom.clone(), host, options) else {
        return;
    };

    let mut now = Duration::ZERO;
    view.tick(now);
    for op in input.ops {
        match op {
            Op::Show => view.show_pane(),
            Op::Hide => view.hide_pane(),
            Op::Toggle => view.set_hidden(!view.is_hidden()),
            Op::Placement(n) => view.set_placement(Placement::ALL[usize::from(n) % 4]),
            Op::DisplayMode(inline) => view.set_display_mode(if inline {
                DisplayMode::Inline
            } else {
                DisplayMode::Overlay
            }),
            Op::Option(name, value) => {
                let _ = view.set_option(&name, &value);
            }
            Op::Tick(ms) => {
                now += Duration::from_millis(u64::from(ms));
                view.tick(now);
            }
            Op::Veto(on) => veto.set(on),
            Op::DropTransitionEnds(drop) => dom.set_transition_ends_delivered(!drop),
            Op::Dispose => view.dispose(),
        }
    }

    // Whatever happened, the view comes to rest once time runs on.
    veto.set(false);
    for _ in 0..200 {
        if view.is_idle() {
            break;
        }
        now += Duration::from_millis(16);
        view.tick(now);
    }
    assert!(view.is_idle(), "stuck in {}", view.state_name());

    // Every after-event answers an allowed before-event of the same kind.
    let log = dom.event_log();
    let mut open: Option<&str> = None;
    for event in &log {
        match event.name {
            "beforeshow" | "beforehide" => {
                assert!(open.is_none(), "overlapping sequences: {log:?}");
                if !event.default_prevented {
                    open = Some(event.name);
                }
            }
            "aftershow" => assert_eq!(open.take(), Some("beforeshow"), "{log:?}"),
            "afterhide" => assert_eq!(open.take(), Some("beforehide"), "{log:?}"),
            _ => {}
        }
    }
    if view.state() != PaneState::Disposed {
        assert!(open.is_none(), "unfinished sequence at rest: {log:?}");
    }
});
