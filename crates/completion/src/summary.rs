use serde::{Deserialize, Serialize};

use funnel_catalog::QuestionCatalog;
use funnel_core::ledger::AnswerLedger;

/// One line of the completion summary: a question's prompt and the display
/// label of the selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub prompt: String,
    pub answer: String,
}

/// Human-readable digest of a finished session, in ledger order. One entry
/// per answered question; the last recorded value wins on re-answers because
/// the ledger replaces in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSummary {
    pub entries: Vec<SummaryEntry>,
}

impl AnswerSummary {
    pub fn build(answers: &AnswerLedger, catalog: &QuestionCatalog) -> Self {
        let entries = answers
            .iter()
            .map(|answer| {
                let prompt = catalog
                    .get(&answer.question_id)
                    .map(|q| q.prompt.clone())
                    .unwrap_or_else(|| answer.question_id.clone());
                let label = catalog
                    .option_label(&answer.question_id, &answer.value)
                    .map(str::to_string)
                    .unwrap_or_else(|| answer.value.clone());
                SummaryEntry {
                    prompt,
                    answer: label,
                }
            })
            .collect();
        Self { entries }
    }

    /// Flat "prompt: answer" rendering carried in the notification payload.
    pub fn to_message(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.prompt, e.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
