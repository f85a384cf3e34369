//! Transition driver — the timing layer between begun and applied
//! transitions.
//!
//! The machine itself is synchronous; this driver owns it behind a mutex,
//! sleeps out each scheduled transition on the runtime, and re-checks the
//! completion latch after every mutation. An epoch counter guards scheduled
//! callbacks against firing into a torn-down session: `shutdown` bumps the
//! epoch and any sleeper holding a stale epoch discards its effect.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use funnel_core::ledger::AnswerLedger;
use funnel_core::types::Intent;

use crate::machine::{NavigationMachine, PendingTransition};
use crate::view::DisplayState;

/// Receives the answered ledger once the completion latch fires. The latch
/// is already set when this runs, so implementations own only the side
/// effects (summary, notification, redirect).
pub trait CompletionHandler: Send + Sync {
    fn on_complete(&self, session_id: &str, answers: AnswerLedger);
}

/// No-op handler for tests and headless sessions.
pub struct NoOpCompletion;

impl CompletionHandler for NoOpCompletion {
    fn on_complete(&self, _session_id: &str, _answers: AnswerLedger) {}
}

#[derive(Clone)]
pub struct FlowDriver {
    machine: Arc<Mutex<NavigationMachine>>,
    completion: Arc<dyn CompletionHandler>,
    epoch: Arc<AtomicU64>,
}

impl FlowDriver {
    pub fn new(machine: NavigationMachine, completion: Arc<dyn CompletionHandler>) -> Self {
        info!(session_id = %machine.session_id(), "Funnel session opened");
        machine.emit_session_started();
        Self {
            machine: Arc::new(Mutex::new(machine)),
            completion,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Feeds one intent into the machine. A begun transition is slept out on
    /// the runtime and applied when its delay elapses; the completion latch
    /// is re-checked after every mutation.
    pub fn dispatch(&self, intent: Intent) {
        let scheduled = {
            let mut machine = self.machine.lock().expect("navigation mutex poisoned");
            machine.handle_intent(intent)
        };

        if let Some(scheduled) = scheduled {
            let driver = self.clone();
            let epoch = self.epoch.load(Ordering::SeqCst);
            tokio::spawn(async move {
                tokio::time::sleep(scheduled.delay).await;
                driver.apply(epoch, scheduled.pending);
            });
        }

        self.check_completion();
    }

    pub fn session_id(&self) -> String {
        self.machine
            .lock()
            .expect("navigation mutex poisoned")
            .session_id()
            .to_string()
    }

    pub fn display_state(&self) -> DisplayState {
        self.machine
            .lock()
            .expect("navigation mutex poisoned")
            .display_state()
    }

    /// Read access to the machine for assertions and ad-hoc inspection.
    pub fn with_machine<R>(&self, f: impl FnOnce(&NavigationMachine) -> R) -> R {
        let machine = self.machine.lock().expect("navigation mutex poisoned");
        f(&machine)
    }

    /// Tears the session down: scheduled transitions that have not fired yet
    /// are discarded when they wake.
    pub fn shutdown(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        debug!("Funnel session torn down");
    }

    fn apply(&self, epoch: u64, pending: PendingTransition) {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(?pending, "Discarding transition scheduled before teardown");
            return;
        }
        {
            let mut machine = self.machine.lock().expect("navigation mutex poisoned");
            machine.complete_transition(pending);
        }
        self.check_completion();
    }

    fn check_completion(&self) {
        let fired = {
            let mut machine = self.machine.lock().expect("navigation mutex poisoned");
            machine
                .try_latch_completion()
                .map(|answers| (machine.session_id().to_string(), answers))
        };
        // Side effects run outside the lock; the latch already guarantees
        // this branch is taken at most once per session.
        if let Some((session_id, answers)) = fired {
            self.completion.on_complete(&session_id, answers);
        }
    }
}
