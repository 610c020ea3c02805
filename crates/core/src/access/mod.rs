//! Permission checks.
//!
//! Cluster leads are users in the `{CLUSTER_CODE}_CLUSTER_LEADS` group.
//! Superusers pass every check.

pub mod error;
pub mod policy;

pub use error::AccessError;
pub use policy::{AccessPolicy, Actor, ProjectScope, cluster_lead_group};
