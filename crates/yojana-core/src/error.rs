//! # Error Hierarchy
//!
//! Structured error types for the Yojana Stack, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Each variant carries the offending input and the expected format so that
//! a misconfigured scheme pack can be diagnosed from the error alone.

use thiserror::Error;

/// Top-level error type for the Yojana Stack core.
#[derive(Error, Debug)]
pub enum YojanaError {
    /// Domain primitive or entity validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for domain primitives and entity invariants.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Policy identifier is empty.
    #[error("invalid policy ID: must be non-empty")]
    InvalidPolicyId,

    /// Document identifier is empty.
    #[error("invalid document ID: must be non-empty")]
    InvalidDocumentId,

    /// Clause identifier is empty.
    #[error("invalid clause ID: must be non-empty")]
    InvalidClauseId,

    /// Timestamp string matches none of the accepted fixed formats.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A clause's `effective_to` is not strictly after its `effective_from`.
    #[error("clause {clause_id}: effective_to {effective_to} must be strictly after effective_from {effective_from}")]
    EffectiveRangeInverted {
        /// The clause whose range is inverted.
        clause_id: String,
        /// The clause's effective-from timestamp.
        effective_from: String,
        /// The clause's effective-to timestamp.
        effective_to: String,
    },
}
