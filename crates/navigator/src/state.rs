use funnel_core::types::{InterstitialKind, Stage};
use serde::{Deserialize, Serialize};

/// Per-session navigation state. Mutated exclusively by the machine's
/// transition functions; everything else reads through the accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationState {
    pub(crate) stage: Stage,
    pub(crate) current_question_id: Option<String>,
    pub(crate) history: Vec<String>,
    pub(crate) transition_in_flight: bool,
    pub(crate) completion_fired: bool,
}

impl NavigationState {
    /// Session positioned at the first question of a non-empty catalog.
    pub(crate) fn at_question(first_id: String) -> Self {
        Self {
            stage: Stage::Questions,
            current_question_id: Some(first_id.clone()),
            history: vec![first_id],
            transition_in_flight: false,
            completion_fired: false,
        }
    }

    /// Session over an empty catalog: terminal from the start. The
    /// completion latch still never fires because the ledger stays empty.
    pub(crate) fn exhausted() -> Self {
        Self {
            stage: Stage::Completing,
            current_question_id: None,
            history: Vec::new(),
            transition_in_flight: false,
            completion_fired: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.current_question_id.as_deref()
    }

    /// Visited question ids, oldest first. The last entry equals the current
    /// question whenever a question is active.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn active_interstitial(&self) -> Option<InterstitialKind> {
        match self.stage {
            Stage::Interstitial(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn transition_in_flight(&self) -> bool {
        self.transition_in_flight
    }

    /// One-way completion latch; true forever once the trigger has fired.
    pub fn completion_fired(&self) -> bool {
        self.completion_fired
    }
}
