//! Normative error types.

use thiserror::Error;

/// Errors that can occur while building normative files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormativeError {
    /// Registry names must look like `LAST|SECOND|FIRST`.
    #[error("Malformed registry name (expected LAST|SECOND|FIRST): {0}")]
    MalformedName(String),
}
