use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single selectable option on a question card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Stable value recorded in the answer ledger.
    pub value: String,
    /// Human-readable text shown on the card and in the completion summary.
    pub label: String,
}

/// One question of the funnel. Immutable, supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
}

impl QuestionDefinition {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, options: Vec<QuestionOption>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
        }
    }

    /// Looks up the display label for an option value.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// Convenience constructor for an option.
pub fn option(value: impl Into<String>, label: impl Into<String>) -> QuestionOption {
    QuestionOption {
        value: value.into(),
        label: label.into(),
    }
}

/// A recorded answer. The ledger holds at most one per question id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: String,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// Interstitial content slots that can be bound between question pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterstitialKind {
    Testimonial,
    SocialProof,
    Incentive,
}

/// Which screen class the session is currently showing. An interstitial
/// carries its kind in the variant payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "interstitial")]
pub enum Stage {
    Questions,
    Interstitial(InterstitialKind),
    Completing,
}

/// User-intent events accepted by the navigation core. These are the only
/// inbound signals; everything else is derived state flowing out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Intent {
    AnswerSelected { question_id: String, value: String },
    Next,
    Previous,
}

/// Funnel lifecycle event emitted through the event sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub session_id: String,
    pub question_id: Option<String>,
    pub interstitial: Option<InterstitialKind>,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStarted,
    AnswerRecorded,
    QuestionAdvanced,
    QuestionRetreated,
    InterstitialEntered,
    InterstitialExited,
    IntentDropped,
    FunnelCompleted,
    NotificationSent,
    NotificationSkipped,
    NotificationFailed,
    RedirectBroadcast,
    RedirectFallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_label_resolves_known_value() {
        let q = QuestionDefinition::new(
            "q1",
            "What best describes your business?",
            vec![option("saas", "SaaS / software"), option("retail", "Retail")],
        );
        assert_eq!(q.option_label("retail"), Some("Retail"));
        assert_eq!(q.option_label("unknown"), None);
    }

    #[test]
    fn stage_serializes_with_interstitial_payload() {
        let json = serde_json::to_string(&Stage::Interstitial(InterstitialKind::SocialProof)).unwrap();
        assert!(json.contains("interstitial"));
        assert!(json.contains("social_proof"));

        let round: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(round, Stage::Interstitial(InterstitialKind::SocialProof));
    }

    #[test]
    fn intent_deserializes_from_tagged_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"type":"answer_selected","question_id":"q2","value":"saas"}"#,
        )
        .unwrap();
        assert_eq!(
            intent,
            Intent::AnswerSelected {
                question_id: "q2".into(),
                value: "saas".into()
            }
        );
    }
}
