//! Shared types, errors, and configuration for Payreport.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for upstream ledger references
//! - Keyset pagination for upstream list calls
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
