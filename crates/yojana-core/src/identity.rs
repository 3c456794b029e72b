//! # Identity Newtypes
//!
//! Newtypes for the three identifier kinds in the policy graph. Each is a
//! distinct type: you cannot pass a [`DocumentId`] where a [`ClauseId`] is
//! expected, even though both are stable strings carried in the source packs.
//!
//! ## Validation
//!
//! Identifiers are validated to be non-empty at construction time. No further
//! format restrictions are imposed because ID conventions vary across scheme
//! publishers (e.g. `pmkisan-gazette-2019-02`, `c-pmkisan-eligibility-v1`).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a government scheme / policy (e.g. `pm-kisan`).
///
/// Every document and clause in the graph belongs to exactly one policy;
/// active-set queries are scoped by this identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// Create a policy identifier from a string, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPolicyId`] if the string is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidPolicyId);
        }
        Ok(Self(s))
    }

    /// Access the policy identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a physical legal instrument: a gazette notification,
/// circular, act, or similar document that defines clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document identifier from a string, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDocumentId`] if the string is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidDocumentId);
        }
        Ok(Self(s))
    }

    /// Access the document identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one atomic, independently versioned legal provision.
///
/// Unique across the whole graph, not merely within its policy. A later
/// notification that changes a provision introduces a *new* clause ID and
/// points it at the one it supersedes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClauseId(String);

impl ClauseId {
    /// Create a clause identifier from a string, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidClauseId`] if the string is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidClauseId);
        }
        Ok(Self(s))
    }

    /// Access the clause identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClauseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
