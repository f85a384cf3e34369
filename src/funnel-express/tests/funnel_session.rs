//! End-to-end session test: the demo funnel driven through the transition
//! driver with paused time, from first question to the completion pipeline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use funnel_catalog::seed_demo_funnel;
use funnel_completion::{
    AnswerSummary, CompletionNotifier, CompletionPipeline, PageNavigator, Redirector,
};
use funnel_core::config::{NotificationConfig, RedirectConfig, TimingConfig};
use funnel_core::event_bus::capture_sink;
use funnel_core::ledger::AnswerLedger;
use funnel_core::types::{EventType, Intent, Stage};
use funnel_navigator::{CompletionHandler, FlowDriver, NavigationMachine};

struct CaptureCompletion {
    calls: Mutex<Vec<(String, AnswerLedger)>>,
}

impl CaptureCompletion {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl CompletionHandler for CaptureCompletion {
    fn on_complete(&self, session_id: &str, answers: AnswerLedger) {
        self.calls
            .lock()
            .unwrap()
            .push((session_id.to_string(), answers));
    }
}

#[derive(Default)]
struct CaptureNavigator {
    visited: Mutex<Vec<String>>,
}

impl PageNavigator for CaptureNavigator {
    fn goto(&self, url: &str) {
        self.visited.lock().unwrap().push(url.to_string());
    }
}

fn answer(question_id: &str, value: &str) -> Intent {
    Intent::AnswerSelected {
        question_id: question_id.into(),
        value: value.into(),
    }
}

/// Dispatches an intent and lets any begun transition apply.
async fn step(driver: &FlowDriver, intent: Intent) {
    driver.dispatch(intent);
    tokio::time::sleep(Duration::from_millis(600)).await;
}

#[tokio::test(start_paused = true)]
async fn demo_funnel_runs_front_to_back() {
    let (catalog, bindings) = seed_demo_funnel();
    let catalog = Arc::new(catalog);
    let completion = Arc::new(CaptureCompletion::new());
    let machine = NavigationMachine::new(
        catalog.clone(),
        Arc::new(bindings),
        TimingConfig::default(),
    );
    let driver = FlowDriver::new(machine, completion.clone());

    // First question card.
    let view = driver.display_state();
    assert_eq!(view.stage, Stage::Questions);
    assert_eq!(view.question.as_ref().unwrap().definition.id, "business-type");
    assert!(!view.can_go_back);

    // q1 -> testimonial interstitial -> q2, with a detour back to q1.
    step(&driver, answer("business-type", "saas")).await;
    step(&driver, Intent::Next).await;
    assert!(matches!(driver.display_state().stage, Stage::Interstitial(_)));

    step(&driver, Intent::Previous).await;
    let view = driver.display_state();
    assert_eq!(view.question.as_ref().unwrap().definition.id, "business-type");
    assert_eq!(
        view.question.as_ref().unwrap().selected.as_deref(),
        Some("saas")
    );
    driver.with_machine(|m| assert_eq!(m.state().history(), ["business-type"]));

    step(&driver, Intent::Next).await; // back into the interstitial
    step(&driver, Intent::Next).await; // continue to ad-spend
    let view = driver.display_state();
    assert_eq!(view.question.as_ref().unwrap().definition.id, "ad-spend");
    assert_eq!(view.progress_percent, 33);

    // Straight through the rest.
    step(&driver, answer("ad-spend", "1k-10k")).await;
    step(&driver, Intent::Next).await;
    step(&driver, answer("growth-goal", "leads")).await;
    step(&driver, Intent::Next).await; // social proof interstitial
    step(&driver, Intent::Next).await;
    step(&driver, answer("lead-channel", "search")).await;
    step(&driver, Intent::Next).await;
    step(&driver, answer("launch-window", "asap")).await;
    step(&driver, Intent::Next).await; // incentive interstitial
    step(&driver, Intent::Next).await;
    step(&driver, answer("contact-pref", "email")).await;
    step(&driver, Intent::Next).await; // exhausts the sequence

    driver.with_machine(|m| {
        assert_eq!(m.state().stage(), Stage::Completing);
        assert_eq!(
            m.state().history(),
            [
                "business-type",
                "ad-spend",
                "growth-goal",
                "lead-channel",
                "launch-window",
                "contact-pref"
            ]
        );
        assert!(m.state().completion_fired());
    });

    // Completion fired exactly once, with every answer in order.
    let calls = completion.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (_, answers) = &calls[0];
    let summary = AnswerSummary::build(answers, &catalog);
    assert_eq!(summary.len(), 6);
    assert_eq!(summary.entries[0].prompt, "What best describes your business?");
    assert_eq!(summary.entries[0].answer, "SaaS / software");
    assert_eq!(summary.entries[5].answer, "Email it to me");
}

#[tokio::test(start_paused = true)]
async fn completion_pipeline_redirects_once_and_skips_absent_webhook() {
    let (catalog, bindings) = seed_demo_funnel();
    let catalog = Arc::new(catalog);
    let sink = capture_sink();
    let navigator = Arc::new(CaptureNavigator::default());

    let pipeline = Arc::new(CompletionPipeline::new(
        catalog.clone(),
        Arc::new(
            CompletionNotifier::new(NotificationConfig::default()).with_event_sink(sink.clone()),
        ),
        Arc::new(
            Redirector::new(
                RedirectConfig {
                    destination_url: "https://example.com/thank-you".into(),
                },
                navigator.clone(),
            )
            .with_event_sink(sink.clone()),
        ),
    ));

    let machine = NavigationMachine::new(
        catalog,
        Arc::new(bindings),
        TimingConfig::default(),
    )
    .with_event_sink(sink.clone());
    let driver = FlowDriver::new(machine, pipeline);

    for (question, value) in [
        ("business-type", "local"),
        ("ad-spend", "none"),
        ("growth-goal", "sales"),
        ("lead-channel", "referral"),
        ("launch-window", "month"),
        ("contact-pref", "call"),
    ] {
        step(&driver, answer(question, value)).await;
        step(&driver, Intent::Next).await;
        // Bound pairs interpose an interstitial; continue through it.
        if matches!(driver.display_state().stage, Stage::Interstitial(_)) {
            step(&driver, Intent::Next).await;
        }
    }

    // Let the spawned notification task settle.
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        navigator.visited.lock().unwrap().as_slice(),
        ["https://example.com/thank-you"]
    );
    assert_eq!(sink.count_type(EventType::FunnelCompleted), 1);
    assert_eq!(sink.count_type(EventType::NotificationSkipped), 1);
    assert_eq!(sink.count_type(EventType::RedirectFallback), 1);
    assert_eq!(sink.count_type(EventType::SessionStarted), 1);
}
