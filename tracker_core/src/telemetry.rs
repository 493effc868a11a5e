//! Fire-and-forget telemetry seam

use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Sink for tracker events such as combatant defeats
///
/// Events are fire-and-forget; implementations must not fail the caller.
pub trait TelemetrySink {
    fn track_event(&mut self, name: &str, payload: Value);
}

/// Emits events through `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn track_event(&mut self, name: &str, payload: Value) {
        tracing::info!(target: "telemetry", event = name, %payload);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn track_event(&mut self, _name: &str, _payload: Value) {}
}

/// Buffers events for later inspection, mainly in tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<(String, Value)>,
}

impl TelemetrySink for RecordingSink {
    fn track_event(&mut self, name: &str, payload: Value) {
        self.events.push((name.to_string(), payload));
    }
}

/// Shared handle, letting a caller keep observing a sink it handed off
impl TelemetrySink for Rc<RefCell<RecordingSink>> {
    fn track_event(&mut self, name: &str, payload: Value) {
        self.borrow_mut().track_event(name, payload);
    }
}
