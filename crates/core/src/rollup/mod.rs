//! Target and reached roll-ups.
//!
//! Totals are always rebuilt from the current rows, never adjusted by
//! deltas.

pub mod service;

#[cfg(test)]
mod service_props;

pub use service::{ReachedEntry, Rollup, TargetAndReached};
