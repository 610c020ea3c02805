//! Project planning: lifecycle of the planned tree and duplication rules.
//!
//! The planned tree is Project → ActivityPlan → TargetLocation →
//! DisaggregationLocation. Project state changes cascade to every plan
//! and target location underneath it.
//!
//! # Modules
//!
//! - `types` - Project state and planning summaries
//! - `error` - Planning-specific error types
//! - `service` - Project state transitions
//! - `copy` - Rules for duplicating projects, plans and target locations

pub mod copy;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use copy::CopyRules;
pub use error::PlanningError;
pub use service::ProjectLifecycle;
pub use types::{PlanSummary, ProjectState, ProjectTransition};
