//! In-memory event capture for logging assertions
//!
//! `init_test_capture` installs a recording layer as the global subscriber
//! once per test binary. Tests then look events up by `op` and `event`,
//! the two canonical fields every `log_op_*` macro writes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use affirm_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};

/// One recorded event: its level, target and every field rendered as text
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    /// Whether this is the `event` boundary of operation `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

/// Renders strings verbatim and everything else through `Debug`
struct FieldRecorder<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type EventBuffer = Arc<Mutex<Vec<CapturedEvent>>>;

struct RecordingLayer {
    events: EventBuffer,
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Shared handle on the captured events
///
/// The buffer is process-wide: tests running in parallel see each other's
/// events, so queries should key on a distinct `op` or on fields unique to
/// the test.
#[derive(Clone, Default)]
pub struct TestCapture {
    events: EventBuffer,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Every event logged by operation `op`, oldest first
    pub fn events_for(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op() == Some(op))
            .collect()
    }

    /// First `event` boundary of `op` matching `predicate`
    pub fn find<P>(&self, op: &str, event: &str, predicate: P) -> Option<CapturedEvent>
    where
        P: Fn(&CapturedEvent) -> bool,
    {
        self.events()
            .into_iter()
            .find(|e| e.is(op, event) && predicate(e))
    }

    pub fn count_events<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics when no `event` boundary of `op` was captured.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "Expected event op={} event={} not found among {} captured events",
            op,
            event,
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the recording layer (first call only) and return the shared handle
///
/// Events are recorded at every level. When another subscriber was already
/// installed the handle stays empty.
///
/// # Example
///
/// ```
/// use affirm_core::logging_facility::test_capture::init_test_capture;
/// use affirm_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("render_mismatch");
/// capture.assert_event_exists("render_mismatch", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            let layer = RecordingLayer {
                events: capture.events.clone(),
            };
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
