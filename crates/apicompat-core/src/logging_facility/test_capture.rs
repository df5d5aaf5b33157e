//! In-memory event recorder for asserting on log output in tests.
//!
//! Events are stored flat: every field value is rendered to a string, with
//! `op` and `event` lifted out since nearly every assertion filters on them.

use crate::core_types::schema::{FIELD_EVENT, FIELD_OP, FIELD_PACKAGE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn from_tracing(event: &Event<'_>) -> Self {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        let fields = fields.0;
        CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        }
    }
}

#[derive(Default)]
struct FieldMap(HashMap<String, String>);

impl FieldMap {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldMap {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    // Strings would otherwise be quoted by their Debug form.
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Shared handle onto the recorded events
#[derive(Clone, Default)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        match self.buffer.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Events of one operation, in emission order
    pub fn events_for(&self, op: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.op.as_deref() == Some(op))
    }

    /// Events tagged with one package path. Tests share one global
    /// subscriber, so filtering on a unique package keeps them independent.
    pub fn events_for_package(&self, path: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.field(FIELD_PACKAGE) == Some(path))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.filtered(predicate).len()
    }

    /// # Panics
    ///
    /// Panics if no event carries both `op` and `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let matching = self.count_events(|e| {
            e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event)
        });
        assert!(
            matching > 0,
            "no {}/{} event among {} captured",
            op,
            event,
            self.events().len()
        );
    }

    fn filtered<F>(&self, predicate: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }

    fn push(&self, event: CapturedEvent) {
        if let Ok(mut events) = self.buffer.lock() {
            events.push(event);
        }
    }
}

impl<S: Subscriber> Layer<S> for TestCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.push(CapturedEvent::from_tracing(event));
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the recorder as the process-wide subscriber on first use and
/// return a handle to it.
///
/// # Example
///
/// ```
/// use apicompat_core::logging_facility::test_capture::init_test_capture;
/// use apicompat_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("my_operation");
/// capture.assert_event_exists("my_operation", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            tracing_subscriber::registry().with(capture.clone()).init();
            capture
        })
        .clone()
}
