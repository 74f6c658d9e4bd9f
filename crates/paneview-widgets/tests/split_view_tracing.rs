//! Structured diagnostics emitted by the split view.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use paneview_backend::Surface;
use paneview_web::MemoryDom;
use paneview_widgets::split_view::{SplitView, SplitViewOptions};
use pretty_assertions::assert_eq;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default, Clone, PartialEq)]
struct Record {
    target: String,
    message: String,
    from: Option<String>,
    to: Option<String>,
    event: Option<String>,
}

#[derive(Debug, Default)]
struct TraceState {
    records: Vec<Record>,
}

struct TraceCapture {
    state: Arc<Mutex<TraceState>>,
}

impl<S> Layer<S> for TraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct RecordVisitor<'a>(&'a mut Record);

        impl tracing::field::Visit for RecordVisitor<'_> {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                match field.name() {
                    "from" => self.0.from = Some(value.to_owned()),
                    "to" => self.0.to = Some(value.to_owned()),
                    "event" => self.0.event = Some(value.to_owned()),
                    _ => {}
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0.message = format!("{value:?}");
                }
            }
        }

        let mut record = Record {
            target: event.metadata().target().to_owned(),
            ..Record::default()
        };
        event.record(&mut RecordVisitor(&mut record));
        self.state
            .lock()
            .expect("trace state lock")
            .records
            .push(record);
    }
}

fn capture() -> (Arc<Mutex<TraceState>>, tracing::subscriber::DefaultGuard) {
    let state = Arc::new(Mutex::new(TraceState::default()));
    let subscriber = tracing_subscriber::registry().with(TraceCapture {
        state: Arc::clone(&state),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();
    (state, guard)
}

fn mounted() -> (MemoryDom, SplitView<MemoryDom>) {
    let mut dom = MemoryDom::new();
    let host = dom.create_element();
    let body = dom.body();
    dom.append_child(body, host);
    let view = SplitView::new(dom.clone(), host, SplitViewOptions::default()).unwrap();
    (dom, view)
}

fn run(view: &mut SplitView<MemoryDom>, frames: u64) {
    for frame in 1..=frames {
        view.tick(Duration::from_millis(16 * frame));
    }
}

#[test]
fn state_transitions_are_traced() {
    let (state, _guard) = capture();
    let (_dom, mut view) = mounted();
    view.tick(Duration::ZERO);
    view.show_pane();
    run(&mut view, 60);

    let snapshot = state.lock().expect("trace state lock");
    let transitions: Vec<(String, String)> = snapshot
        .records
        .iter()
        .filter(|r| r.target == "paneview.split_view" && r.from.is_some())
        .map(|r| (r.from.clone().unwrap(), r.to.clone().unwrap()))
        .collect();
    let expected = [
        ("Initializing", "Hidden"),
        ("Hidden", "RequestingShow"),
        ("RequestingShow", "Showing"),
        ("Showing", "Shown"),
    ]
    .map(|(a, b)| (a.to_owned(), b.to_owned()));
    assert_eq!(transitions, expected.to_vec());
}

#[test]
fn veto_is_traced() {
    let (state, _guard) = capture();
    let (dom, mut view) = mounted();
    dom.add_event_listener(view.element(), "beforehide", |e| e.prevent_default());
    view.set_hidden(false);
    run(&mut view, 60);
    view.hide_pane();
    run(&mut view, 60);

    let snapshot = state.lock().expect("trace state lock");
    assert!(
        snapshot
            .records
            .iter()
            .any(|r| r.event.as_deref() == Some("beforehide") && r.message.contains("vetoed")),
        "missing veto record: {:?}",
        snapshot.records
    );
}

#[test]
fn ignored_option_is_traced() {
    let (state, _guard) = capture();
    let (_dom, mut view) = mounted();
    assert!(!view.set_placement_value("sideways"));

    let snapshot = state.lock().expect("trace state lock");
    assert!(
        snapshot
            .records
            .iter()
            .any(|r| r.message.contains("ignored placement value"))
    );
}
