//! Completion webhook — one fire-and-forget POST per finished session.
//!
//! The identity fields in the payload are operator configuration, never
//! participant data. A missing endpoint skips the call; a failed delivery is
//! logged and dropped, never retried.

use std::sync::Arc;

use tracing::{debug, info, warn};

use funnel_core::config::NotificationConfig;
use funnel_core::event_bus::{make_event, noop_sink, EventSink};
use funnel_core::types::EventType;

use crate::summary::AnswerSummary;

pub struct CompletionNotifier {
    config: NotificationConfig,
    client: reqwest::Client,
    events: Arc<dyn EventSink>,
}

impl CompletionNotifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            events: noop_sink(),
        }
    }

    /// Attach an event sink for emitting delivery events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// The flat key/value payload posted to the endpoint.
    pub fn payload(&self, summary: &AnswerSummary) -> serde_json::Value {
        serde_json::json!({
            "from_name": self.config.from_name,
            "reply_to": self.config.reply_to,
            "message": summary.to_message(),
        })
    }

    /// Posts the summary to the configured endpoint. Skips silently when no
    /// endpoint is configured; failures are observability-only.
    pub async fn dispatch(&self, session_id: &str, summary: &AnswerSummary) {
        let url = match &self.config.endpoint {
            Some(url) => url.clone(),
            None => {
                debug!(session_id, "No notification endpoint configured, skipping");
                self.events.emit(make_event(
                    EventType::NotificationSkipped,
                    session_id,
                    None,
                    None,
                ));
                return;
            }
        };

        let payload = self.payload(summary);
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(
                    session_id,
                    status = response.status().as_u16(),
                    "Completion notification delivered"
                );
                self.events.emit(make_event(
                    EventType::NotificationSent,
                    session_id,
                    None,
                    None,
                ));
            }
            Ok(response) => {
                warn!(
                    session_id,
                    status = response.status().as_u16(),
                    "Completion notification rejected"
                );
                self.events.emit(make_event(
                    EventType::NotificationFailed,
                    session_id,
                    None,
                    None,
                ));
            }
            Err(error) => {
                warn!(session_id, %error, "Completion notification failed");
                self.events.emit(make_event(
                    EventType::NotificationFailed,
                    session_id,
                    None,
                    None,
                ));
            }
        }
    }
}
