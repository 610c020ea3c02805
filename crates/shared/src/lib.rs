//! Shared types, errors, and configuration for ReportHub.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, CarryOverMode, ReportingConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
