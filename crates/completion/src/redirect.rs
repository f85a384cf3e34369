//! Redirect signal — moves the participant out of the funnel when the
//! session completes.
//!
//! An embedded session notifies its hosting context with a structured
//! message; a top-level session, or a broadcast that errors, navigates
//! directly instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use funnel_core::config::RedirectConfig;
use funnel_core::event_bus::{make_event, noop_sink, EventSink};
use funnel_core::types::EventType;

/// The structured message broadcast to a hosting context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectMessage {
    pub action: String,
    pub url: String,
}

impl RedirectMessage {
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            action: "redirect".to_string(),
            url: url.into(),
        }
    }
}

/// A context embedding this session (an enclosing page or shell) that can
/// receive broadcast messages.
pub trait EmbeddingContext: Send + Sync {
    fn broadcast(&self, message: &RedirectMessage) -> anyhow::Result<()>;
}

/// Same-process navigation used when no embedding context is reachable.
pub trait PageNavigator: Send + Sync {
    fn goto(&self, url: &str);
}

pub struct Redirector {
    destination: String,
    embedding: Option<Arc<dyn EmbeddingContext>>,
    navigator: Arc<dyn PageNavigator>,
    events: Arc<dyn EventSink>,
}

impl Redirector {
    pub fn new(config: RedirectConfig, navigator: Arc<dyn PageNavigator>) -> Self {
        Self {
            destination: config.destination_url,
            embedding: None,
            navigator,
            events: noop_sink(),
        }
    }

    /// Attach the hosting context to broadcast to before falling back.
    pub fn with_embedding(mut self, embedding: Arc<dyn EmbeddingContext>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach an event sink for emitting redirect events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Sends the participant to the destination: broadcast first, direct
    /// navigation when no context exists or the broadcast errors.
    pub fn redirect(&self, session_id: &str) {
        let message = RedirectMessage::to(self.destination.clone());
        match &self.embedding {
            Some(context) => match context.broadcast(&message) {
                Ok(()) => {
                    info!(session_id, url = %message.url, "Redirect broadcast to hosting context");
                    self.events.emit(make_event(
                        EventType::RedirectBroadcast,
                        session_id,
                        None,
                        None,
                    ));
                    return;
                }
                Err(error) => {
                    warn!(session_id, %error, "Redirect broadcast failed, navigating directly");
                }
            },
            None => {
                debug!(session_id, "No hosting context, navigating directly");
            }
        }
        self.navigator.goto(&self.destination);
        self.events.emit(make_event(
            EventType::RedirectFallback,
            session_id,
            None,
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use funnel_core::event_bus::capture_sink;

    use super::*;

    #[derive(Default)]
    struct CaptureNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl PageNavigator for CaptureNavigator {
        fn goto(&self, url: &str) {
            self.visited.lock().unwrap().push(url.to_string());
        }
    }

    #[derive(Default)]
    struct CaptureContext {
        messages: Mutex<Vec<RedirectMessage>>,
    }

    impl EmbeddingContext for CaptureContext {
        fn broadcast(&self, message: &RedirectMessage) -> anyhow::Result<()> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct FailingContext;

    impl EmbeddingContext for FailingContext {
        fn broadcast(&self, _message: &RedirectMessage) -> anyhow::Result<()> {
            Err(anyhow!("hosting context gone"))
        }
    }

    fn config() -> RedirectConfig {
        RedirectConfig {
            destination_url: "https://example.com/thank-you".into(),
        }
    }

    #[test]
    fn message_serializes_with_redirect_action() {
        let json = serde_json::to_string(&RedirectMessage::to("https://example.com/x")).unwrap();
        assert_eq!(
            json,
            r#"{"action":"redirect","url":"https://example.com/x"}"#
        );
    }

    #[test]
    fn broadcasts_when_embedded() {
        let navigator = Arc::new(CaptureNavigator::default());
        let context = Arc::new(CaptureContext::default());
        let sink = capture_sink();
        let redirector = Redirector::new(config(), navigator.clone())
            .with_embedding(context.clone())
            .with_event_sink(sink.clone());

        redirector.redirect("session-1");

        let messages = context.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].action, "redirect");
        assert_eq!(messages[0].url, "https://example.com/thank-you");
        assert!(navigator.visited.lock().unwrap().is_empty());
        assert_eq!(sink.count_type(EventType::RedirectBroadcast), 1);
    }

    #[test]
    fn navigates_directly_when_top_level() {
        let navigator = Arc::new(CaptureNavigator::default());
        let sink = capture_sink();
        let redirector =
            Redirector::new(config(), navigator.clone()).with_event_sink(sink.clone());

        redirector.redirect("session-1");

        assert_eq!(
            navigator.visited.lock().unwrap().as_slice(),
            ["https://example.com/thank-you"]
        );
        assert_eq!(sink.count_type(EventType::RedirectFallback), 1);
    }

    #[test]
    fn falls_back_when_broadcast_errors() {
        let navigator = Arc::new(CaptureNavigator::default());
        let redirector =
            Redirector::new(config(), navigator.clone()).with_embedding(Arc::new(FailingContext));

        redirector.redirect("session-1");

        assert_eq!(
            navigator.visited.lock().unwrap().as_slice(),
            ["https://example.com/thank-you"]
        );
    }
}
