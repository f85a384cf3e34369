//! Unified event bus — trait for emitting funnel lifecycle events from any
//! module.
//!
//! The navigation machine, transition driver, and completion pipeline accept
//! an `Arc<dyn EventSink>` and emit typed events for every transition and
//! side effect, giving operators per-session visibility without coupling the
//! core to a transport.

use crate::types::{EventType, FunnelEvent, InterstitialKind};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Trait for emitting funnel events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: FunnelEvent);
}

/// No-op sink for tests and modules that don't need event emission.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: FunnelEvent) {}
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureSink {
    events: Mutex<Vec<FunnelEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<FunnelEvent> {
        self.events.lock().expect("event bus mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("event bus mutex poisoned").len()
    }

    pub fn count_type(&self, event_type: EventType) -> usize {
        self.events
            .lock()
            .expect("event bus mutex poisoned")
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("event bus mutex poisoned").clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: FunnelEvent) {
        self.events.lock().expect("event bus mutex poisoned").push(event);
    }
}

/// Convenience builder for creating `FunnelEvent` with minimal boilerplate.
pub fn make_event(
    event_type: EventType,
    session_id: impl Into<String>,
    question_id: Option<String>,
    interstitial: Option<InterstitialKind>,
) -> FunnelEvent {
    FunnelEvent {
        event_id: Uuid::new_v4(),
        event_type,
        session_id: session_id.into(),
        question_id,
        interstitial,
        detail: None,
        timestamp: Utc::now(),
    }
}

/// Convenience: create a no-op event bus for modules that don't need it.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}
