//! # Policy Knowledge Base
//!
//! The caller-owned context bundling a loaded [`PolicyGraph`] with its
//! [`LoadReport`], plus the conveniences the reasoning layer uses most:
//! point-in-time clause lookup, eligibility checks with reasons, and
//! "what changed" diffs across supersession links.
//!
//! There is no process-wide singleton. Construct one, publish it behind an
//! `Arc`, and serve reads from it; to pick up changed packs, build a fresh
//! instance and swap the reference, never mutate one that readers share.

use std::path::Path;

use yojana_core::{ClauseId, PolicyId, Timestamp};
use yojana_diff::{generate_diff, DiffReport};
use yojana_graph::{Clause, Document, PolicyGraph};
use yojana_rules::{evaluate, explain_failure, Profile};

use crate::error::PackResult;
use crate::loader::{load_dir, LoadReport};

/// The outcome of evaluating a clause's eligibility logic for a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityVerdict {
    /// Whether the profile satisfies the clause's logic.
    pub eligible: bool,
    /// Human-readable reasons for a failed check; empty when eligible.
    pub reasons: Vec<String>,
}

/// A loaded, immutable snapshot of a scheme rule base.
#[derive(Debug)]
pub struct PolicyKnowledgeBase {
    graph: PolicyGraph,
    report: LoadReport,
}

impl PolicyKnowledgeBase {
    /// Load every pack file in `dir` and build the knowledge base.
    ///
    /// # Errors
    ///
    /// Only directory-level I/O failure; per-file problems are recorded in
    /// the [`LoadReport`] instead.
    pub fn load(dir: &Path) -> PackResult<Self> {
        let (graph, report) = load_dir(dir)?;
        Ok(Self { graph, report })
    }

    /// Wrap an already-built graph (e.g. assembled programmatically).
    pub fn from_graph(graph: PolicyGraph) -> Self {
        Self {
            graph,
            report: LoadReport::default(),
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &PolicyGraph {
        &self.graph
    }

    /// What the load run did, including diagnostics.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// The clauses of `policy_id` legally in force at `at`.
    pub fn active_clauses(&self, policy_id: &PolicyId, at: &Timestamp) -> Vec<&Clause> {
        self.graph.get_active_clauses(policy_id, at)
    }

    /// The document(s) that establish `clause_id`, for citation.
    pub fn provenance_chain(&self, clause_id: &ClauseId) -> Vec<&Document> {
        self.graph.get_provenance_chain(clause_id)
    }

    /// Evaluate a clause's logic for a profile.
    ///
    /// Returns `None` for a clause that carries no logic (an informational
    /// provision has nothing to evaluate). Otherwise the verdict
    /// bundles the fail-closed boolean with the failure reasons.
    pub fn check_eligibility(
        &self,
        clause: &Clause,
        profile: &Profile,
    ) -> Option<EligibilityVerdict> {
        let logic = clause.logic.as_ref()?;
        let eligible = evaluate(logic, profile);
        let reasons = if eligible {
            Vec::new()
        } else {
            explain_failure(logic, profile)
        };
        Some(EligibilityVerdict { eligible, reasons })
    }

    /// Diff a clause's wording against its successor's, following the
    /// supersession link. `None` when the clause is unknown or nothing
    /// supersedes it.
    pub fn diff_against_successor(&self, clause_id: &ClauseId) -> Option<DiffReport> {
        let old = self.graph.clause(clause_id)?;
        let new = self.graph.superseding_clause(clause_id)?;
        Some(generate_diff(&old.text, &new.text))
    }
}
