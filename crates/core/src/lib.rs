//! Core business logic for Payreport.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Everything here is synchronous and deterministic given its inputs.
//!
//! # Modules
//!
//! - `calendar` - Banking days, banking months and report windows
//! - `movement` - Ledger movement model and classification
//! - `reports` - Movement export rows
//! - `normatives` - Fixed-width regulatory files

pub mod calendar;
pub mod movement;
pub mod normatives;
pub mod reports;
