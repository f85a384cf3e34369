//! Derived display state — the read model renderers consume. Computed on
//! demand from the machine; never stored.

use serde::Serialize;

use funnel_core::types::{QuestionDefinition, Stage};

use crate::machine::NavigationMachine;

/// Everything a renderer needs to draw the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayState {
    pub stage: Stage,
    /// The active question card; absent on interstitial and terminal screens.
    pub question: Option<QuestionView>,
    pub can_go_back: bool,
    /// round(100 × (position of current question + 1) / total questions).
    pub progress_percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub definition: QuestionDefinition,
    /// Previously recorded value, pre-filled when revisiting.
    pub selected: Option<String>,
    /// 1-based position shown as "question N of M".
    pub number: usize,
    pub total: usize,
}

impl NavigationMachine {
    pub fn display_state(&self) -> DisplayState {
        let stage = self.state().stage();
        let total = self.catalog().len();

        let question = match stage {
            Stage::Questions => self.state().current_question_id().and_then(|id| {
                let definition = self.catalog().get(id)?.clone();
                let number = self.catalog().position(id)? + 1;
                Some(QuestionView {
                    selected: self.ledger().get(id).map(|a| a.value.clone()),
                    definition,
                    number,
                    total,
                })
            }),
            _ => None,
        };

        let can_go_back = match stage {
            Stage::Questions => self.state().history().len() > 1,
            Stage::Interstitial(_) => true,
            Stage::Completing => false,
        };

        let progress_percent = match stage {
            Stage::Completing => 100,
            _ => self
                .state()
                .current_question_id()
                .and_then(|id| self.catalog().position(id))
                .map(|pos| (((pos + 1) as f64 / total as f64) * 100.0).round() as u8)
                .unwrap_or(0),
        };

        DisplayState {
            stage,
            question,
            can_go_back,
            progress_percent,
        }
    }
}
