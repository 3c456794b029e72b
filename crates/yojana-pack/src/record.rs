//! # Pack File Records
//!
//! The wire shapes of a scheme pack file and their conversion into domain
//! entities. Records keep identifiers as raw strings and logic as a raw
//! JSON value; conversion validates IDs, checks entity invariants, and
//! parses logic into the rule AST. Any conversion failure other than a
//! logic parse defect rejects the whole file (a failed file registers no
//! partial state); a logic defect is reported and the clause loads without
//! logic, which is fail-closed.

use serde::Deserialize;
use serde_json::Value;

use yojana_core::{
    AuthorityLevel, ClauseId, ClauseStatus, DocumentId, PolicyId, Timestamp, ValidationError,
};
use yojana_graph::{Clause, Document};
use yojana_rules::RuleExpr;

/// One pack file: zero or more documents and zero or more clauses.
#[derive(Debug, Default, Deserialize)]
pub struct PackFileRecord {
    /// Document records in this pack.
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    /// Clause records in this pack.
    #[serde(default)]
    pub clauses: Vec<ClauseRecord>,
}

/// The wire shape of a document.
#[derive(Debug, Deserialize)]
pub struct DocumentRecord {
    /// Stable document ID.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Owning policy ID.
    pub policy_id: String,
    /// Kind of instrument.
    pub doc_type: AuthorityLevel,
    /// Issue date in one of the fixed textual formats.
    pub date_issued: Timestamp,
    /// Optional source URL.
    #[serde(default)]
    pub url: Option<String>,
    /// IDs of the clauses this document defines.
    #[serde(default)]
    pub clauses: Vec<String>,
}

impl DocumentRecord {
    /// Convert into a domain [`Document`], validating identifiers.
    pub fn into_document(self) -> Result<Document, ValidationError> {
        Ok(Document {
            id: DocumentId::new(self.id)?,
            title: self.title,
            policy_id: PolicyId::new(self.policy_id)?,
            doc_type: self.doc_type,
            date_issued: self.date_issued,
            url: self.url,
            clauses: self
                .clauses
                .into_iter()
                .map(ClauseId::new)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// The wire shape of a clause.
#[derive(Debug, Deserialize)]
pub struct ClauseRecord {
    /// Stable clause ID.
    pub id: String,
    /// Owning policy ID.
    pub policy_id: String,
    /// ID of the single defining document.
    pub parent_doc_id: String,
    /// Level of legal authority.
    pub authority_level: AuthorityLevel,
    /// Optional signing authority.
    #[serde(default)]
    pub signatory: Option<String>,
    /// Effective-from timestamp (required).
    pub effective_from: Timestamp,
    /// Optional effective-to timestamp.
    #[serde(default)]
    pub effective_to: Option<Timestamp>,
    /// Publisher-recorded lifecycle status.
    pub status: ClauseStatus,
    /// ID of the clause that replaces this one.
    #[serde(default)]
    pub superseded_by: Option<String>,
    /// IDs of clauses amending this one.
    #[serde(default)]
    pub amended_by: Vec<String>,
    /// The legal wording.
    pub text: String,
    /// Eligibility logic in the single-key-map wire form.
    #[serde(default)]
    pub logic: Option<Value>,
    /// Prerequisite clause IDs.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Mutually exclusive clause IDs.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Free-text tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A clause whose logic value failed AST parsing. The clause still loads,
/// without logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicDefect {
    /// The clause carrying the defective logic.
    pub clause_id: ClauseId,
    /// The parse error, rendered.
    pub detail: String,
}

impl ClauseRecord {
    /// Convert into a domain [`Clause`], validating identifiers and the
    /// effective range, and parsing logic into the rule AST.
    ///
    /// A logic parse failure is returned as a [`LogicDefect`] alongside the
    /// clause rather than rejecting it: the clause's text and version links
    /// stay queryable, and absent logic grants nothing.
    pub fn into_clause(self) -> Result<(Clause, Option<LogicDefect>), ValidationError> {
        let id = ClauseId::new(self.id)?;

        let (logic, defect) = match self.logic {
            None => (None, None),
            Some(value) => match RuleExpr::from_value(&value) {
                Ok(expr) => (Some(expr), None),
                Err(err) => (
                    None,
                    Some(LogicDefect {
                        clause_id: id.clone(),
                        detail: err.to_string(),
                    }),
                ),
            },
        };

        let clause = Clause {
            id,
            policy_id: PolicyId::new(self.policy_id)?,
            parent_doc_id: DocumentId::new(self.parent_doc_id)?,
            authority_level: self.authority_level,
            signatory: self.signatory,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            status: self.status,
            superseded_by: self
                .superseded_by
                .map(ClauseId::new)
                .transpose()?,
            amended_by: self
                .amended_by
                .into_iter()
                .map(ClauseId::new)
                .collect::<Result<_, _>>()?,
            text: self.text,
            logic,
            depends_on: self
                .depends_on
                .into_iter()
                .map(ClauseId::new)
                .collect::<Result<_, _>>()?,
            excludes: self
                .excludes
                .into_iter()
                .map(ClauseId::new)
                .collect::<Result<_, _>>()?,
            tags: self.tags,
        };
        clause.validate()?;
        Ok((clause, defect))
    }
}
