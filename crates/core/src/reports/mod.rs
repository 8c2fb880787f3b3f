//! Movement export reports.
//!
//! Turns grouped ledger movements into the rows of the commerce and account
//! movement exports, plus the glossary sheet and file name that go with them.

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
