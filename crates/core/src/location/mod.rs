//! Administrative location tree.
//!
//! Locations form a strict hierarchy: Country (0) → Province (1) →
//! District (2) → Zone (3). A node's level is always its parent's level
//! plus one, and only countries have no parent.

pub mod error;
pub mod tree;

pub use error::LocationError;
pub use tree::{AdminLevel, LocationNode, LocationPath, LocationService};
