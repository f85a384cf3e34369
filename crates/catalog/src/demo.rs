//! Demo funnel content for development and the runner binary.

use funnel_core::types::{option, InterstitialKind, QuestionDefinition};
use tracing::info;

use crate::bindings::{BindingTable, InterstitialBinding};
use crate::catalog::QuestionCatalog;

/// Seeds a six-question marketing questionnaire with an interstitial after
/// the first, third, and fifth questions.
pub fn seed_demo_funnel() -> (QuestionCatalog, BindingTable) {
    info!("Seeding demo funnel");

    let questions = vec![
        QuestionDefinition::new(
            "business-type",
            "What best describes your business?",
            vec![
                option("ecommerce", "E-commerce store"),
                option("saas", "SaaS / software"),
                option("agency", "Marketing agency"),
                option("local", "Local business"),
            ],
        ),
        QuestionDefinition::new(
            "ad-spend",
            "What is your current monthly ad spend?",
            vec![
                option("none", "Not advertising yet"),
                option("under-1k", "Under $1,000"),
                option("1k-10k", "$1,000 – $10,000"),
                option("over-10k", "Over $10,000"),
            ],
        ),
        QuestionDefinition::new(
            "growth-goal",
            "What is your primary growth goal?",
            vec![
                option("leads", "More qualified leads"),
                option("sales", "More direct sales"),
                option("retention", "Better customer retention"),
            ],
        ),
        QuestionDefinition::new(
            "lead-channel",
            "Which channel drives most of your leads today?",
            vec![
                option("search", "Paid search"),
                option("social", "Social media"),
                option("email", "Email"),
                option("referral", "Word of mouth"),
            ],
        ),
        QuestionDefinition::new(
            "launch-window",
            "How soon do you want to launch a campaign?",
            vec![
                option("asap", "As soon as possible"),
                option("month", "Within a month"),
                option("quarter", "This quarter"),
            ],
        ),
        QuestionDefinition::new(
            "contact-pref",
            "How should we deliver your growth plan?",
            vec![
                option("email", "Email it to me"),
                option("call", "Book a call"),
            ],
        ),
    ];

    let catalog = QuestionCatalog::new(questions).expect("demo catalog is well-formed");

    let bindings = BindingTable::new(vec![
        InterstitialBinding::new("business-type", "ad-spend", InterstitialKind::Testimonial),
        InterstitialBinding::new("growth-goal", "lead-channel", InterstitialKind::SocialProof),
        InterstitialBinding::new("launch-window", "contact-pref", InterstitialKind::Incentive),
    ])
    .expect("demo bindings are well-formed");

    (catalog, bindings)
}
