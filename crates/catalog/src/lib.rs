//! Question catalog and interstitial bindings — the static configuration a
//! funnel session runs against: ordered question definitions, answer-value
//! branch rules, and the interstitial slots bound between question pairs.

pub mod bindings;
pub mod catalog;
pub mod demo;

pub use bindings::{BindingTable, InterstitialBinding};
pub use catalog::{BranchRule, QuestionCatalog};
pub use demo::seed_demo_funnel;
