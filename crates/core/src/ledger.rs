//! Answer ledger — insertion-ordered record of every answered question.
//!
//! Re-answering a question replaces its value in place; the original
//! position is kept so the completion summary reads in the order the
//! participant first saw the questions.

use serde::{Deserialize, Serialize};

use crate::types::Answer;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerLedger {
    answers: Vec<Answer>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer. Replaces the existing entry for the same question
    /// without moving it; appends otherwise. Never fails.
    pub fn record(&mut self, answer: Answer) {
        match self
            .answers
            .iter_mut()
            .find(|a| a.question_id == answer.question_id)
        {
            Some(existing) => existing.value = answer.value,
            None => self.answers.push(answer),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Answers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_new_answers_in_order() {
        let mut ledger = AnswerLedger::new();
        ledger.record(Answer::new("q1", "a"));
        ledger.record(Answer::new("q2", "b"));
        ledger.record(Answer::new("q3", "c"));

        let ids: Vec<&str> = ledger.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn re_answering_replaces_value_in_place() {
        let mut ledger = AnswerLedger::new();
        ledger.record(Answer::new("q1", "a"));
        ledger.record(Answer::new("q2", "b"));
        ledger.record(Answer::new("q1", "z"));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get("q1").unwrap().value, "z");
        let ids: Vec<&str> = ledger.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[test]
    fn get_misses_unanswered_questions() {
        let mut ledger = AnswerLedger::new();
        assert!(ledger.is_empty());
        ledger.record(Answer::new("q1", "a"));
        assert!(ledger.get("q9").is_none());
        assert!(!ledger.is_empty());
    }
}
