//! Funnel Express — interactive questionnaire funnels for marketing lead
//! capture.
//!
//! Runs the demo funnel as a terminal session: questions one at a time,
//! interstitial cards between bound pairs, back-navigation, and the
//! completion pipeline (webhook + redirect) when the last question is
//! answered.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use funnel_catalog::seed_demo_funnel;
use funnel_completion::{CompletionNotifier, CompletionPipeline, PageNavigator, Redirector};
use funnel_core::config::AppConfig;
use funnel_core::types::{Intent, InterstitialKind, Stage};
use funnel_navigator::{FlowDriver, NavigationMachine};

#[derive(Parser, Debug)]
#[command(name = "funnel-express")]
#[command(about = "Interactive questionnaire funnels for marketing lead capture")]
#[command(version)]
struct Cli {
    /// Completion webhook endpoint (overrides config)
    #[arg(long, env = "FUNNEL_EXPRESS__NOTIFICATION__ENDPOINT")]
    notify_url: Option<String>,

    /// Redirect destination after completion (overrides config)
    #[arg(long, env = "FUNNEL_EXPRESS__REDIRECT__DESTINATION_URL")]
    redirect_url: Option<String>,
}

/// Terminal stand-in for the browser's location change.
struct TerminalNavigator;

impl PageNavigator for TerminalNavigator {
    fn goto(&self, url: &str) {
        println!("\n>> Taking you to {url}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Quiet by default so log lines don't interleave
    // with the interactive cards; raise RUST_LOG for diagnostics.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "funnel_express=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(url) = cli.notify_url {
        config.notification.endpoint = Some(url);
    }
    if let Some(url) = cli.redirect_url {
        config.redirect.destination_url = url;
    }

    info!(
        notify = config.notification.endpoint.as_deref().unwrap_or("<none>"),
        redirect = %config.redirect.destination_url,
        "Funnel Express starting up"
    );

    let (catalog, bindings) = seed_demo_funnel();
    let catalog = Arc::new(catalog);
    let bindings = Arc::new(bindings);
    bindings.validate_against(&catalog)?;

    let notifier = Arc::new(CompletionNotifier::new(config.notification.clone()));
    let redirector = Arc::new(Redirector::new(
        config.redirect.clone(),
        Arc::new(TerminalNavigator),
    ));
    let pipeline = Arc::new(CompletionPipeline::new(
        catalog.clone(),
        notifier,
        redirector,
    ));

    let machine = NavigationMachine::new(catalog, bindings, config.timing.clone());
    let driver = FlowDriver::new(machine, pipeline);

    // Longest presentation delay, so a render after a command always sees
    // the applied transition.
    let settle = Duration::from_millis(config.timing.interstitial_exit_ms + 50);

    println!("Welcome! Answer with an option number, then:");
    println!("  n = next, b = back, s = show screen, q = quit\n");
    render(&driver);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "s" | "state" => {}
            "n" | "next" => {
                driver.dispatch(Intent::Next);
                tokio::time::sleep(settle).await;
            }
            "b" | "back" => {
                driver.dispatch(Intent::Previous);
                tokio::time::sleep(settle).await;
            }
            input => {
                if let Some(intent) = selection_intent(&driver, input) {
                    driver.dispatch(intent);
                } else {
                    println!("(unrecognized input: {input})");
                }
            }
        }

        if driver.with_machine(|m| m.state().completion_fired()) {
            println!("\nThanks! Your growth plan is on its way.");
            break;
        }
        render(&driver);
    }

    driver.shutdown();
    Ok(())
}

/// Maps a typed option number onto an answer intent for the active question.
fn selection_intent(driver: &FlowDriver, input: &str) -> Option<Intent> {
    let choice: usize = input.parse().ok()?;
    let view = driver.display_state().question?;
    let option = view.definition.options.get(choice.checked_sub(1)?)?;
    Some(Intent::AnswerSelected {
        question_id: view.definition.id.clone(),
        value: option.value.clone(),
    })
}

fn render(driver: &FlowDriver) {
    let view = driver.display_state();
    match view.stage {
        Stage::Questions => {
            if let Some(question) = view.question {
                println!(
                    "\n[{}%] Question {} of {}",
                    view.progress_percent, question.number, question.total
                );
                println!("{}", question.definition.prompt);
                for (i, option) in question.definition.options.iter().enumerate() {
                    let marker = if question.selected.as_deref() == Some(option.value.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("  {}{} {}", i + 1, marker, option.label);
                }
                if view.can_go_back {
                    println!("  (b to go back)");
                }
            }
        }
        Stage::Interstitial(kind) => {
            println!("\n--- {} ---", interstitial_card(kind));
            println!("  (n to continue, b to go back)");
        }
        Stage::Completing => {
            println!("\nWrapping up...");
        }
    }
}

fn interstitial_card(kind: InterstitialKind) -> &'static str {
    match kind {
        InterstitialKind::Testimonial => {
            "\"Funnel Express doubled our qualified pipeline in a quarter.\" — Dana R., CMO"
        }
        InterstitialKind::SocialProof => "Over 4,800 growing teams build their funnels with us",
        InterstitialKind::Incentive => "Finish up and get a free 30-minute strategy session",
    }
}
