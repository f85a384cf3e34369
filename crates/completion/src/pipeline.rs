//! Wires summary, notifier, and redirector behind the driver's completion
//! seam. Runs once per session; the machine's latch is already set when
//! `on_complete` is invoked.

use std::sync::Arc;

use tracing::info;

use funnel_catalog::QuestionCatalog;
use funnel_core::ledger::AnswerLedger;
use funnel_navigator::CompletionHandler;

use crate::notify::CompletionNotifier;
use crate::redirect::Redirector;
use crate::summary::AnswerSummary;

pub struct CompletionPipeline {
    catalog: Arc<QuestionCatalog>,
    notifier: Arc<CompletionNotifier>,
    redirector: Arc<Redirector>,
}

impl CompletionPipeline {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        notifier: Arc<CompletionNotifier>,
        redirector: Arc<Redirector>,
    ) -> Self {
        Self {
            catalog,
            notifier,
            redirector,
        }
    }
}

impl CompletionHandler for CompletionPipeline {
    fn on_complete(&self, session_id: &str, answers: AnswerLedger) {
        let summary = AnswerSummary::build(&answers, &self.catalog);
        info!(
            session_id,
            entries = summary.len(),
            "Funnel completed, dispatching side effects"
        );

        // Fire-and-forget: a slow or failing delivery never delays the
        // participant's redirect.
        let notifier = self.notifier.clone();
        let owned_session = session_id.to_string();
        tokio::spawn(async move {
            notifier.dispatch(&owned_session, &summary).await;
        });

        self.redirector.redirect(session_id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use funnel_core::config::{NotificationConfig, RedirectConfig};
    use funnel_core::types::{option, Answer, QuestionDefinition};

    use crate::redirect::PageNavigator;

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

    #[tokio::test]
    async fn completion_redirects_even_without_an_endpoint() {
        let catalog = Arc::new(
            QuestionCatalog::new(vec![QuestionDefinition::new(
                "q1",
                "The only question",
                vec![option("yes", "Yes")],
            )])
            .unwrap(),
        );
        let navigator = Arc::new(CaptureNavigator::default());
        let pipeline = CompletionPipeline::new(
            catalog,
            Arc::new(CompletionNotifier::new(NotificationConfig::default())),
            Arc::new(Redirector::new(
                RedirectConfig {
                    destination_url: "https://example.com/thank-you".into(),
                },
                navigator.clone(),
            )),
        );

        let mut answers = AnswerLedger::new();
        answers.record(Answer::new("q1", "yes"));
        pipeline.on_complete("session-1", answers);

        assert_eq!(
            navigator.visited.lock().unwrap().as_slice(),
            ["https://example.com/thank-you"]
        );
    }
}
