//! # Entity Model
//!
//! Typed records for the two node kinds in the policy graph: [`Document`]
//! (one physical legal instrument) and [`Clause`] (one atomic, independently
//! versioned provision). Both are created at load time and never mutated by
//! this subsystem afterward; a fresh load replaces the whole graph.

use serde::{Deserialize, Serialize};

use yojana_core::{
    AuthorityLevel, ClauseId, ClauseStatus, ContentDigest, DocumentId, PolicyId, Timestamp,
    ValidationError,
};
use yojana_rules::RuleExpr;

/// One physical legal instrument: a gazette notification, circular, act,
/// or similar document that defines clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, unique across the graph.
    pub id: DocumentId,
    /// Human-readable title.
    pub title: String,
    /// The policy this instrument belongs to.
    pub policy_id: PolicyId,
    /// The kind of instrument.
    pub doc_type: AuthorityLevel,
    /// When the instrument was issued.
    pub date_issued: Timestamp,
    /// Source URL, when the publisher provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The clauses this instrument defines, as recorded by the publisher.
    /// Provenance edges are derived from each clause's `parent_doc_id`,
    /// which is the canonical direction; this list is informational.
    #[serde(default)]
    pub clauses: Vec<ClauseId>,
}

/// One atomic, independently versioned legal provision.
///
/// A later notification that changes a provision creates a *new* clause
/// carrying its own effective dates, and the old clause's `superseded_by`
/// points at it. That convention is what makes point-in-time queries
/// possible without ever editing a loaded clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// Stable identifier, unique across the whole graph.
    pub id: ClauseId,
    /// The policy this provision belongs to.
    pub policy_id: PolicyId,
    /// The single document that defines this clause.
    pub parent_doc_id: DocumentId,
    /// The level of legal authority behind the provision.
    pub authority_level: AuthorityLevel,
    /// Signing authority, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatory: Option<String>,
    /// When the provision takes force.
    pub effective_from: Timestamp,
    /// When the provision lapses; open-ended if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<Timestamp>,
    /// Publisher-recorded lifecycle status. Informational only; the
    /// active-set algorithm is driven by dates and supersession edges.
    pub status: ClauseStatus,
    /// The clause that replaces this one, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<ClauseId>,
    /// Clauses that amend this one's text without replacing it.
    #[serde(default)]
    pub amended_by: Vec<ClauseId>,
    /// The legal wording.
    pub text: String,
    /// Machine-evaluable eligibility logic, for clauses that encode a rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<RuleExpr>,
    /// Prerequisite clauses. Informational; available for traversal.
    #[serde(default)]
    pub depends_on: Vec<ClauseId>,
    /// Clauses this one mutually excludes.
    #[serde(default)]
    pub excludes: Vec<ClauseId>,
    /// Free-text tags, e.g. marking eligibility-relevant clauses.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Clause {
    /// Check the clause's internal invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EffectiveRangeInverted`] when
    /// `effective_to` is not strictly after `effective_from`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(to) = self.effective_to {
            if to <= self.effective_from {
                return Err(ValidationError::EffectiveRangeInverted {
                    clause_id: self.id.as_str().to_string(),
                    effective_from: self.effective_from.to_canonical_string(),
                    effective_to: to.to_canonical_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether this clause's own date range covers the reference instant:
    /// `effective_from` inclusive, `effective_to` exclusive, open-ended
    /// when `effective_to` is absent. Supersession is the graph's concern,
    /// not this method's.
    pub fn is_effective_at(&self, at: &Timestamp) -> bool {
        self.effective_from <= *at && self.effective_to.map_or(true, |to| to > *at)
    }

    /// SHA-256 fingerprint of the legal wording, for change detection.
    pub fn text_digest(&self) -> ContentDigest {
        ContentDigest::of_text(&self.text)
    }

    /// Whether the clause carries a tag (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn sample_clause() -> Clause {
        Clause {
            id: ClauseId::new("c-pmkisan-eligibility-v1").unwrap(),
            policy_id: PolicyId::new("pm-kisan").unwrap(),
            parent_doc_id: DocumentId::new("pmkisan-gazette-2019-02").unwrap(),
            authority_level: AuthorityLevel::Notification,
            signatory: Some("Secretary, DAC&FW".to_string()),
            effective_from: ts("2019-02-24"),
            effective_to: None,
            status: ClauseStatus::Active,
            superseded_by: None,
            amended_by: vec![],
            text: "Small and marginal farmer families with cultivable landholding up to 2 hectares are eligible.".to_string(),
            logic: None,
            depends_on: vec![],
            excludes: vec![],
            tags: vec!["eligibility".to_string()],
        }
    }

    #[test]
    fn open_ended_clause_validates() {
        assert!(sample_clause().validate().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut clause = sample_clause();
        clause.effective_to = Some(ts("2019-01-01"));
        assert!(clause.validate().is_err());
    }

    #[test]
    fn zero_length_range_is_rejected() {
        let mut clause = sample_clause();
        clause.effective_to = Some(clause.effective_from);
        assert!(clause.validate().is_err());
    }

    #[test]
    fn effective_window_is_from_inclusive_to_exclusive() {
        let mut clause = sample_clause();
        clause.effective_to = Some(ts("2019-06-01"));
        assert!(!clause.is_effective_at(&ts("2019-02-23")));
        assert!(clause.is_effective_at(&ts("2019-02-24")));
        assert!(clause.is_effective_at(&ts("2019-05-31")));
        assert!(!clause.is_effective_at(&ts("2019-06-01")));
        assert!(!clause.is_effective_at(&ts("2019-07-01")));
    }

    #[test]
    fn open_ended_clause_never_lapses() {
        let clause = sample_clause();
        assert!(clause.is_effective_at(&ts("2099-12-31")));
    }

    #[test]
    fn text_digest_tracks_wording() {
        let a = sample_clause();
        let mut b = sample_clause();
        assert_eq!(a.text_digest(), b.text_digest());
        b.text.push_str(" Provided further that...");
        assert_ne!(a.text_digest(), b.text_digest());
    }

    #[test]
    fn has_tag_is_exact() {
        let clause = sample_clause();
        assert!(clause.has_tag("eligibility"));
        assert!(!clause.has_tag("eligib"));
    }

    #[test]
    fn clause_serde_round_trip_with_logic() {
        let mut clause = sample_clause();
        clause.logic = Some(
            RuleExpr::from_value(&json!({"<=": [{"var": "land_holding"}, 2]})).unwrap(),
        );
        let json = serde_json::to_string(&clause).unwrap();
        let back: Clause = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clause);
    }

    #[test]
    fn document_serde_defaults_optional_fields() {
        let doc: Document = serde_json::from_value(json!({
            "id": "pmkisan-gazette-2019-02",
            "title": "PM-KISAN Operational Guidelines",
            "policy_id": "pm-kisan",
            "doc_type": "notification",
            "date_issued": "2019-02-24"
        }))
        .unwrap();
        assert!(doc.url.is_none());
        assert!(doc.clauses.is_empty());
    }
}
