pub mod config;
pub mod error;
pub mod event_bus;
pub mod ledger;
pub mod types;

pub use config::AppConfig;
pub use error::{FunnelError, FunnelResult};
pub use ledger::AnswerLedger;
