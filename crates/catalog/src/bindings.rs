//! Interstitial binding table — which interstitial card appears between
//! which pair of questions.
//!
//! Both directions are derived from the same triples at construction, so a
//! forward lookup and its inverse can never disagree: continuing from an
//! interstitial lands on the original `to` question, and going back lands on
//! the original `from` question.

use std::collections::HashMap;

use funnel_core::error::{FunnelError, FunnelResult};
use funnel_core::types::InterstitialKind;
use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;

/// One static binding: show `kind` when navigating from `from_id` to `to_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterstitialBinding {
    pub from_id: String,
    pub to_id: String,
    pub kind: InterstitialKind,
}

impl InterstitialBinding {
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        kind: InterstitialKind,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind,
        }
    }
}

/// Forward map plus inverse lookup over the configured bindings.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    forward: HashMap<(String, String), InterstitialKind>,
    by_kind: HashMap<InterstitialKind, (String, String)>,
}

impl BindingTable {
    /// Builds the table. A kind bound twice or a question pair bound twice
    /// would make the inverse lookup ambiguous, so both are rejected.
    pub fn new(bindings: Vec<InterstitialBinding>) -> FunnelResult<Self> {
        let mut table = Self::default();
        for binding in bindings {
            let pair = (binding.from_id, binding.to_id);
            if table.by_kind.contains_key(&binding.kind) {
                return Err(FunnelError::Binding(format!(
                    "interstitial kind {:?} bound more than once",
                    binding.kind
                )));
            }
            if table.forward.contains_key(&pair) {
                return Err(FunnelError::Binding(format!(
                    "question pair ({}, {}) bound more than once",
                    pair.0, pair.1
                )));
            }
            table.by_kind.insert(binding.kind, pair.clone());
            table.forward.insert(pair, binding.kind);
        }
        Ok(table)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The interstitial shown between two questions, if any is bound.
    pub fn kind_between(&self, from_id: &str, to_id: &str) -> Option<InterstitialKind> {
        self.forward
            .get(&(from_id.to_string(), to_id.to_string()))
            .copied()
    }

    /// The question the participant was on before entering this interstitial
    /// (back-navigation target).
    pub fn origin_of(&self, kind: InterstitialKind) -> Option<&str> {
        self.by_kind.get(&kind).map(|(from, _)| from.as_str())
    }

    /// The question shown when this interstitial is exited forward.
    pub fn destination_of(&self, kind: InterstitialKind) -> Option<&str> {
        self.by_kind.get(&kind).map(|(_, to)| to.as_str())
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Checks that every bound question id exists in the catalog.
    pub fn validate_against(&self, catalog: &QuestionCatalog) -> FunnelResult<()> {
        for (from, to) in self.by_kind.values() {
            for id in [from, to] {
                if catalog.get(id).is_none() {
                    return Err(FunnelError::Binding(format!(
                        "binding references unknown question '{}'",
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}
