use funnel_core::error::{FunnelError, FunnelResult};
use funnel_core::ledger::AnswerLedger;
use funnel_core::types::QuestionDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Routes a question's answer value to a question elsewhere in the catalog,
/// overriding the linear order. First matching rule wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRule {
    pub from_id: String,
    pub on_value: String,
    pub next_id: String,
}

/// Ordered question configuration with optional branch rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCatalog {
    questions: Vec<QuestionDefinition>,
    branches: Vec<BranchRule>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<QuestionDefinition>) -> FunnelResult<Self> {
        Self::with_branches(questions, Vec::new())
    }

    /// Builds a catalog, rejecting duplicate question ids and branch rules
    /// whose endpoints are not part of the catalog.
    pub fn with_branches(
        questions: Vec<QuestionDefinition>,
        branches: Vec<BranchRule>,
    ) -> FunnelResult<Self> {
        for (i, q) in questions.iter().enumerate() {
            if questions[..i].iter().any(|other| other.id == q.id) {
                return Err(FunnelError::Catalog(format!(
                    "duplicate question id '{}'",
                    q.id
                )));
            }
        }
        for rule in &branches {
            for endpoint in [&rule.from_id, &rule.next_id] {
                if !questions.iter().any(|q| &q.id == endpoint) {
                    return Err(FunnelError::Catalog(format!(
                        "branch rule references unknown question '{}'",
                        endpoint
                    )));
                }
            }
        }
        Ok(Self {
            questions,
            branches,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn first(&self) -> Option<&QuestionDefinition> {
        self.questions.first()
    }

    pub fn get(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Zero-based catalog position of a question.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    /// Display label for an option value of a question.
    pub fn option_label(&self, question_id: &str, value: &str) -> Option<&str> {
        self.get(question_id).and_then(|q| q.option_label(value))
    }

    /// Resolves the question shown after `current_id`. A branch rule matching
    /// the recorded answer wins; otherwise the next catalog position applies.
    /// `None` means the sequence is exhausted.
    pub fn next_id(&self, current_id: &str, answers: &AnswerLedger) -> Option<String> {
        if let Some(answer) = answers.get(current_id) {
            if let Some(rule) = self
                .branches
                .iter()
                .find(|r| r.from_id == current_id && r.on_value == answer.value)
            {
                debug!(
                    from = %rule.from_id,
                    on_value = %rule.on_value,
                    next = %rule.next_id,
                    "Branch rule matched"
                );
                return Some(rule.next_id.clone());
            }
        }
        let pos = self.position(current_id)?;
        self.questions.get(pos + 1).map(|q| q.id.clone())
    }
}
