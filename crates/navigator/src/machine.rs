use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use funnel_catalog::{BindingTable, QuestionCatalog};
use funnel_core::config::TimingConfig;
use funnel_core::event_bus::{make_event, noop_sink, EventSink};
use funnel_core::ledger::AnswerLedger;
use funnel_core::types::{Answer, EventType, Intent, InterstitialKind, Stage};

use crate::state::NavigationState;

/// What a begun transition will do once its presentation delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingTransition {
    /// Forward fade onto the next question card.
    ShowQuestion { next_id: String },
    /// Back fade onto the previous question card; pops history on apply.
    ShowPrevious { target_id: String },
    /// Entrance of an interstitial card. Current question and history stay
    /// untouched until the interstitial is exited forward.
    EnterInterstitial { kind: InterstitialKind },
    /// Forward exit from an interstitial onto its bound destination.
    ContinuePastInterstitial { to_id: String },
    /// Back exit from an interstitial onto the question it was entered from.
    ReturnFromInterstitial { from_id: String },
}

/// A begun transition plus the delay before it applies.
#[derive(Debug, Clone)]
pub struct ScheduledTransition {
    pub pending: PendingTransition,
    pub delay: Duration,
}

/// The navigation state machine. All transition logic is synchronous: an
/// operation *begins* a transition (validates, raises the in-flight gate,
/// returns what to apply and when) and `complete_transition` applies it.
/// The timing between the two lives in the driver, so every rule here is
/// testable without a runtime.
pub struct NavigationMachine {
    session_id: String,
    state: NavigationState,
    ledger: AnswerLedger,
    catalog: Arc<QuestionCatalog>,
    bindings: Arc<BindingTable>,
    timing: TimingConfig,
    events: Arc<dyn EventSink>,
}

impl NavigationMachine {
    /// Creates a session positioned at the catalog's first question, or
    /// already exhausted if the catalog is empty.
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        bindings: Arc<BindingTable>,
        timing: TimingConfig,
    ) -> Self {
        let state = match catalog.first() {
            Some(first) => NavigationState::at_question(first.id.clone()),
            None => NavigationState::exhausted(),
        };
        Self {
            session_id: Uuid::new_v4().to_string(),
            state,
            ledger: AnswerLedger::new(),
            catalog,
            bindings,
            timing,
            events: noop_sink(),
        }
    }

    /// Attach an event sink for emitting funnel events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn catalog(&self) -> &Arc<QuestionCatalog> {
        &self.catalog
    }

    /// Routes an inbound intent to the matching operation.
    pub fn handle_intent(&mut self, intent: Intent) -> Option<ScheduledTransition> {
        match intent {
            Intent::AnswerSelected { question_id, value } => {
                self.record_answer(Answer::new(question_id, value));
                None
            }
            Intent::Next => match self.state.stage {
                Stage::Questions => self.advance(),
                Stage::Interstitial(_) => self.exit_interstitial_forward(),
                Stage::Completing => self.drop_intent("next after the last question"),
            },
            Intent::Previous => self.retreat(),
        }
    }

    /// Records an answer. Permitted at any time, including mid-transition;
    /// never navigates by itself.
    pub fn record_answer(&mut self, answer: Answer) {
        debug!(
            session_id = %self.session_id,
            question_id = %answer.question_id,
            value = %answer.value,
            "Recording answer"
        );
        let question_id = answer.question_id.clone();
        self.ledger.record(answer);
        self.events.emit(make_event(
            EventType::AnswerRecorded,
            self.session_id.clone(),
            Some(question_id),
            None,
        ));
    }

    /// Moves forward from the active question: into an interstitial if the
    /// (current, next) pair is bound, onto the next question otherwise, or
    /// into the terminal stage when the sequence is exhausted.
    pub fn advance(&mut self) -> Option<ScheduledTransition> {
        if self.state.transition_in_flight {
            return self.drop_intent("next while a transition is in flight");
        }
        if self.state.stage != Stage::Questions {
            return self.drop_intent("next outside the question stage");
        }
        let current = match self.state.current_question_id.clone() {
            Some(id) => id,
            None => return self.drop_intent("next with no active question"),
        };

        match self.catalog.next_id(&current, &self.ledger) {
            None => {
                info!(session_id = %self.session_id, last_question = %current, "Question sequence exhausted");
                self.state.stage = Stage::Completing;
                self.state.current_question_id = None;
                None
            }
            Some(next_id) => match self.bindings.kind_between(&current, &next_id) {
                Some(kind) => self.begin(
                    PendingTransition::EnterInterstitial { kind },
                    self.timing.interstitial_entrance(),
                ),
                None => self.begin(
                    PendingTransition::ShowQuestion { next_id },
                    self.timing.question_fade(),
                ),
            },
        }
    }

    /// Moves backward: from an interstitial to the question it was entered
    /// from, or from a question to the previous history entry. Cannot go
    /// back past the first question.
    pub fn retreat(&mut self) -> Option<ScheduledTransition> {
        if self.state.transition_in_flight {
            return self.drop_intent("previous while a transition is in flight");
        }
        match self.state.stage {
            Stage::Interstitial(kind) => {
                let from_id = match self.bindings.origin_of(kind) {
                    Some(id) => id.to_string(),
                    None => return self.drop_intent("previous on an unbound interstitial"),
                };
                self.begin(
                    PendingTransition::ReturnFromInterstitial { from_id },
                    self.timing.interstitial_exit(),
                )
            }
            Stage::Questions => {
                if self.state.history.len() < 2 {
                    return self.drop_intent("previous at the first question");
                }
                let target_id = self.state.history[self.state.history.len() - 2].clone();
                self.begin(
                    PendingTransition::ShowPrevious { target_id },
                    self.timing.question_fade(),
                )
            }
            Stage::Completing => self.drop_intent("previous after the last question"),
        }
    }

    /// Continues forward out of the active interstitial onto its bound
    /// destination question.
    pub fn exit_interstitial_forward(&mut self) -> Option<ScheduledTransition> {
        if self.state.transition_in_flight {
            return self.drop_intent("continue while a transition is in flight");
        }
        let kind = match self.state.stage {
            Stage::Interstitial(kind) => kind,
            _ => return self.drop_intent("continue outside an interstitial"),
        };
        let to_id = match self.bindings.destination_of(kind) {
            Some(id) => id.to_string(),
            None => return self.drop_intent("continue on an unbound interstitial"),
        };
        self.begin(
            PendingTransition::ContinuePastInterstitial { to_id },
            self.timing.interstitial_exit(),
        )
    }

    /// Applies a begun transition and lowers the in-flight gate.
    pub fn complete_transition(&mut self, pending: PendingTransition) {
        self.state.transition_in_flight = false;
        match pending {
            PendingTransition::ShowQuestion { next_id } => {
                info!(session_id = %self.session_id, question_id = %next_id, "Advanced to question");
                self.state.current_question_id = Some(next_id.clone());
                self.state.history.push(next_id.clone());
                self.events.emit(make_event(
                    EventType::QuestionAdvanced,
                    self.session_id.clone(),
                    Some(next_id),
                    None,
                ));
            }
            PendingTransition::ShowPrevious { target_id } => {
                info!(session_id = %self.session_id, question_id = %target_id, "Retreated to question");
                self.state.history.pop();
                self.state.current_question_id = Some(target_id.clone());
                self.events.emit(make_event(
                    EventType::QuestionRetreated,
                    self.session_id.clone(),
                    Some(target_id),
                    None,
                ));
            }
            PendingTransition::EnterInterstitial { kind } => {
                info!(session_id = %self.session_id, ?kind, "Entered interstitial");
                self.state.stage = Stage::Interstitial(kind);
                self.events.emit(make_event(
                    EventType::InterstitialEntered,
                    self.session_id.clone(),
                    self.state.current_question_id.clone(),
                    Some(kind),
                ));
            }
            PendingTransition::ContinuePastInterstitial { to_id } => {
                let kind = self.state.active_interstitial();
                info!(session_id = %self.session_id, question_id = %to_id, "Continued past interstitial");
                self.state.stage = Stage::Questions;
                self.state.current_question_id = Some(to_id.clone());
                self.state.history.push(to_id.clone());
                self.events.emit(make_event(
                    EventType::InterstitialExited,
                    self.session_id.clone(),
                    Some(to_id),
                    kind,
                ));
            }
            PendingTransition::ReturnFromInterstitial { from_id } => {
                let kind = self.state.active_interstitial();
                info!(session_id = %self.session_id, question_id = %from_id, "Returned from interstitial");
                self.state.stage = Stage::Questions;
                self.state.current_question_id = Some(from_id.clone());
                self.events.emit(make_event(
                    EventType::InterstitialExited,
                    self.session_id.clone(),
                    Some(from_id),
                    kind,
                ));
            }
        }
    }

    /// Latches the one-shot completion when the terminal condition holds:
    /// no current question, at least one recorded answer, latch unfired.
    /// The latch is set before the snapshot leaves this method, so the
    /// caller's side effects can run at most once however often the
    /// condition is re-checked.
    pub fn try_latch_completion(&mut self) -> Option<AnswerLedger> {
        if self.state.completion_fired {
            return None;
        }
        if self.state.stage != Stage::Completing || self.state.current_question_id.is_some() {
            return None;
        }
        if self.ledger.is_empty() {
            return None;
        }
        self.state.completion_fired = true;
        info!(session_id = %self.session_id, answers = self.ledger.len(), "Completion latched");
        self.events.emit(make_event(
            EventType::FunnelCompleted,
            self.session_id.clone(),
            None,
            None,
        ));
        Some(self.ledger.clone())
    }

    pub(crate) fn emit_session_started(&self) {
        self.events.emit(make_event(
            EventType::SessionStarted,
            self.session_id.clone(),
            self.state.current_question_id.clone(),
            None,
        ));
    }

    fn begin(&mut self, pending: PendingTransition, delay: Duration) -> Option<ScheduledTransition> {
        self.state.transition_in_flight = true;
        Some(ScheduledTransition { pending, delay })
    }

    fn drop_intent(&self, reason: &str) -> Option<ScheduledTransition> {
        debug!(session_id = %self.session_id, reason, "Dropping navigation intent");
        let mut event = make_event(
            EventType::IntentDropped,
            self.session_id.clone(),
            self.state.current_question_id.clone(),
            None,
        );
        event.detail = Some(reason.to_string());
        self.events.emit(event);
        None
    }
}
