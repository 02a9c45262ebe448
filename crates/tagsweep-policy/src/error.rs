//! Error types for the policy engine.
//!
//! Version and date parsing failures are deliberately not errors: they fall
//! back to the development classification. Only configuration-level problems
//! surface here.

use thiserror::Error;

/// Errors that can occur while configuring the policy engine.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Unknown protection scope value.
    #[error("invalid protection scope '{value}': expected 'minor' or 'patch'")]
    InvalidScope {
        /// The rejected value.
        value: String,
    },
}
