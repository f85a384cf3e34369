//! Navigation core — the state machine deciding which screen a funnel
//! session shows next, and the timing layer that applies begun transitions
//! after their presentation delay.

pub mod driver;
pub mod machine;
pub mod state;
pub mod view;

pub use driver::{CompletionHandler, FlowDriver, NoOpCompletion};
pub use machine::{NavigationMachine, PendingTransition, ScheduledTransition};
pub use state::NavigationState;
pub use view::{DisplayState, QuestionView};
