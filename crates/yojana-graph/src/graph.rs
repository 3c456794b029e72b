//! # Policy Graph
//!
//! An arena-backed directed graph over [`Document`] and [`Clause`] nodes
//! with three edge kinds. Nodes are addressed by typed integer handles;
//! edges are a closed enum carrying handles, so edge-kind checks are
//! `match` arms rather than string comparisons.
//!
//! ## Reference resolution
//!
//! Packs load in arbitrary order, so a clause may declare a reference to a
//! node that arrives later. Declarations whose target is not yet loaded are
//! held as pending references and materialize into edges the moment the
//! target is added. References that never resolve are tolerated (the edge
//! simply never exists) and reported by [`PolicyGraph::unresolved_references`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use yojana_core::{ClauseId, DocumentId, PolicyId, Timestamp};

use crate::entity::{Clause, Document};

/// Handle of a document node in the graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocHandle(usize);

/// Handle of a clause node in the graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClauseHandle(usize);

/// The closed set of edge kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Clause → defining document (provenance).
    DefinedIn,
    /// Clause → prerequisite clause (informational).
    DependsOn,
    /// Newer clause → the clause it replaces (drives the active set).
    Supersedes,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DefinedIn => "defined_in",
            Self::DependsOn => "depends_on",
            Self::Supersedes => "supersedes",
        };
        write!(f, "{s}")
    }
}

/// A materialized edge between two loaded nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Provenance: `clause` is defined in `doc`.
    DefinedIn {
        /// The defined clause.
        clause: ClauseHandle,
        /// The defining document.
        doc: DocHandle,
    },
    /// Prerequisite: `from` depends on `to`.
    DependsOn {
        /// The dependent clause.
        from: ClauseHandle,
        /// The prerequisite clause.
        to: ClauseHandle,
    },
    /// Replacement: `newer` supersedes `older` once `newer` is in force.
    Supersedes {
        /// The replacing clause.
        newer: ClauseHandle,
        /// The replaced clause.
        older: ClauseHandle,
    },
}

impl Edge {
    /// The clause whose declaration produced this edge. `Supersedes` is
    /// declared by the *older* side (`superseded_by` is the canonical
    /// direction), the other kinds by their source clause.
    fn declaring_clause(&self) -> ClauseHandle {
        match self {
            Self::DefinedIn { clause, .. } => *clause,
            Self::DependsOn { from, .. } => *from,
            Self::Supersedes { older, .. } => *older,
        }
    }
}

/// A declared reference whose target never loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    /// The clause that declared the reference.
    pub clause_id: ClauseId,
    /// Which declaration it was.
    pub kind: EdgeKind,
    /// The target ID that never resolved.
    pub target: String,
}

/// A declaration waiting for its target node to load.
#[derive(Debug, Clone)]
struct PendingRef {
    kind: EdgeKind,
    origin: ClauseHandle,
    target: String,
}

/// The in-memory policy graph: arenas of documents and clauses, ID indexes,
/// materialized edges, and still-pending references.
///
/// Built once by the loader, then read-only. Worst-case query cost is
/// linear in the number of loaded clauses and edges.
#[derive(Debug, Default)]
pub struct PolicyGraph {
    documents: Vec<Document>,
    clauses: Vec<Clause>,
    doc_index: HashMap<DocumentId, DocHandle>,
    clause_index: HashMap<ClauseId, ClauseHandle>,
    edges: Vec<Edge>,
    pending: Vec<PendingRef>,
}

impl PolicyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document node. Idempotent per ID: re-adding overwrites the
    /// node's data in place and keeps its handle. Pending provenance
    /// references targeting this document resolve on first insertion.
    pub fn add_document(&mut self, doc: Document) -> DocHandle {
        if let Some(&handle) = self.doc_index.get(&doc.id) {
            tracing::debug!(doc_id = %doc.id, "re-adding document, overwriting node data");
            self.documents[handle.0] = doc;
            return handle;
        }
        let handle = DocHandle(self.documents.len());
        self.doc_index.insert(doc.id.clone(), handle);
        self.documents.push(doc);
        self.resolve_pending_for_document(handle);
        handle
    }

    /// Insert a clause node and derive its declared edges (`DefinedIn` from
    /// `parent_doc_id`, one `DependsOn` per dependency, one `Supersedes`
    /// from `superseded_by`). Idempotent per ID: re-adding overwrites the
    /// node's data, drops the edges its previous declarations produced, and
    /// re-derives them.
    pub fn add_clause(&mut self, clause: Clause) -> ClauseHandle {
        let handle = match self.clause_index.get(&clause.id) {
            Some(&handle) => {
                if self.clauses[handle.0].text_digest() != clause.text_digest() {
                    tracing::debug!(
                        clause_id = %clause.id,
                        "re-adding clause with changed wording, overwriting node data"
                    );
                }
                self.edges.retain(|e| e.declaring_clause() != handle);
                self.pending.retain(|p| p.origin != handle);
                self.clauses[handle.0] = clause;
                handle
            }
            None => {
                let handle = ClauseHandle(self.clauses.len());
                self.clause_index.insert(clause.id.clone(), handle);
                self.clauses.push(clause);
                self.resolve_pending_for_clause(handle);
                handle
            }
        };
        self.derive_clause_edges(handle);
        handle
    }

    fn derive_clause_edges(&mut self, handle: ClauseHandle) {
        let clause = &self.clauses[handle.0];
        let parent_doc = clause.parent_doc_id.clone();
        let depends_on: Vec<ClauseId> = clause.depends_on.clone();
        let superseded_by = clause.superseded_by.clone();

        match self.doc_index.get(&parent_doc) {
            Some(&doc) => self.edges.push(Edge::DefinedIn { clause: handle, doc }),
            None => self.pending.push(PendingRef {
                kind: EdgeKind::DefinedIn,
                origin: handle,
                target: parent_doc.as_str().to_string(),
            }),
        }

        for dep in depends_on {
            match self.clause_index.get(&dep) {
                Some(&to) => self.edges.push(Edge::DependsOn { from: handle, to }),
                None => self.pending.push(PendingRef {
                    kind: EdgeKind::DependsOn,
                    origin: handle,
                    target: dep.as_str().to_string(),
                }),
            }
        }

        if let Some(successor) = superseded_by {
            match self.clause_index.get(&successor) {
                Some(&newer) => self.edges.push(Edge::Supersedes {
                    newer,
                    older: handle,
                }),
                None => self.pending.push(PendingRef {
                    kind: EdgeKind::Supersedes,
                    origin: handle,
                    target: successor.as_str().to_string(),
                }),
            }
        }
    }

    fn resolve_pending_for_document(&mut self, doc: DocHandle) {
        let id = self.documents[doc.0].id.as_str().to_string();
        let mut resolved = Vec::new();
        self.pending.retain(|p| {
            if p.kind == EdgeKind::DefinedIn && p.target == id {
                resolved.push(p.origin);
                false
            } else {
                true
            }
        });
        for clause in resolved {
            self.edges.push(Edge::DefinedIn { clause, doc });
        }
    }

    fn resolve_pending_for_clause(&mut self, target: ClauseHandle) {
        let id = self.clauses[target.0].id.as_str().to_string();
        let mut resolved = Vec::new();
        self.pending.retain(|p| {
            if p.kind != EdgeKind::DefinedIn && p.target == id {
                resolved.push((p.kind, p.origin));
                false
            } else {
                true
            }
        });
        for (kind, origin) in resolved {
            match kind {
                EdgeKind::DependsOn => self.edges.push(Edge::DependsOn {
                    from: origin,
                    to: target,
                }),
                EdgeKind::Supersedes => self.edges.push(Edge::Supersedes {
                    newer: target,
                    older: origin,
                }),
                EdgeKind::DefinedIn => {}
            }
        }
    }

    /// The clauses of `policy_id` legally in force at `at`.
    ///
    /// Candidate selection filters on the clause's own date range
    /// (`effective_from` inclusive, `effective_to` exclusive, open-ended if
    /// absent); supersession filtering then removes any candidate whose
    /// replacement is *itself* a candidate at `at`. A supersession whose
    /// successor has not yet taken effect, or has lapsed, suppresses
    /// nothing. Result order is unspecified.
    pub fn get_active_clauses(&self, policy_id: &PolicyId, at: &Timestamp) -> Vec<&Clause> {
        let candidates: HashSet<ClauseHandle> = self
            .clauses
            .iter()
            .enumerate()
            .filter(|(_, c)| c.policy_id == *policy_id && c.is_effective_at(at))
            .map(|(i, _)| ClauseHandle(i))
            .collect();

        let superseded: HashSet<ClauseHandle> = self
            .edges
            .iter()
            .filter_map(|edge| match edge {
                Edge::Supersedes { newer, older }
                    if candidates.contains(older) && candidates.contains(newer) =>
                {
                    Some(*older)
                }
                _ => None,
            })
            .collect();

        self.clauses
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let h = ClauseHandle(*i);
                candidates.contains(&h) && !superseded.contains(&h)
            })
            .map(|(_, c)| c)
            .collect()
    }

    /// The document(s) that legally establish `clause_id` (normally exactly
    /// one). An unknown clause or a dangling document reference yields an
    /// empty list, not an error.
    pub fn get_provenance_chain(&self, clause_id: &ClauseId) -> Vec<&Document> {
        let Some(&handle) = self.clause_index.get(clause_id) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter_map(|edge| match edge {
                Edge::DefinedIn { clause, doc } if *clause == handle => {
                    Some(&self.documents[doc.0])
                }
                _ => None,
            })
            .collect()
    }

    /// The clause that replaces `clause_id`, if it is loaded.
    pub fn superseding_clause(&self, clause_id: &ClauseId) -> Option<&Clause> {
        let &handle = self.clause_index.get(clause_id)?;
        self.edges.iter().find_map(|edge| match edge {
            Edge::Supersedes { newer, older } if *older == handle => {
                Some(&self.clauses[newer.0])
            }
            _ => None,
        })
    }

    /// The clause(s) that `clause_id` replaces.
    pub fn superseded_clauses(&self, clause_id: &ClauseId) -> Vec<&Clause> {
        let Some(&handle) = self.clause_index.get(clause_id) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter_map(|edge| match edge {
                Edge::Supersedes { newer, older } if *newer == handle => {
                    Some(&self.clauses[older.0])
                }
                _ => None,
            })
            .collect()
    }

    /// The prerequisite clauses `clause_id` declares, where loaded.
    /// Informational: the active-set algorithm never consults these.
    pub fn dependencies(&self, clause_id: &ClauseId) -> Vec<&Clause> {
        let Some(&handle) = self.clause_index.get(clause_id) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter_map(|edge| match edge {
                Edge::DependsOn { from, to } if *from == handle => Some(&self.clauses[to.0]),
                _ => None,
            })
            .collect()
    }

    /// Every declared reference whose target never loaded. The loader runs
    /// this after the last file as its post-load validation pass.
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        self.pending
            .iter()
            .map(|p| UnresolvedReference {
                clause_id: self.clauses[p.origin.0].id.clone(),
                kind: p.kind,
                target: p.target.clone(),
            })
            .collect()
    }

    /// Look up a document by ID.
    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.doc_index.get(id).map(|h| &self.documents[h.0])
    }

    /// Look up a clause by ID.
    pub fn clause(&self, id: &ClauseId) -> Option<&Clause> {
        self.clause_index.get(id).map(|h| &self.clauses[h.0])
    }

    /// Number of loaded documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of loaded clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Iterate over all loaded clauses.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Iterate over all loaded documents.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}
