#![deny(missing_docs)]

//! # yojana-graph — Temporal Policy Graph
//!
//! The entity model ([`Document`], [`Clause`]) and the in-memory graph over
//! them. The graph answers two questions for the reasoning layer above:
//! which clauses of a policy are legally in force on a reference date, and
//! which document(s) establish a given clause.
//!
//! ## Design Principles
//!
//! 1. **Arena of nodes, typed handles, closed edge enum.** Nodes live in
//!    `Vec` arenas addressed by [`DocHandle`] / [`ClauseHandle`]; edges are
//!    the three-variant [`Edge`] enum carrying handles, not string tags.
//!
//! 2. **Versioning by supersession, never mutation.** A later instrument
//!    introduces a *new* clause that points back at the one it replaces
//!    (`old.superseded_by = new.id` is the canonical direction). Point-in-
//!    time queries fall out of date filtering plus supersession exclusion.
//!
//! 3. **Dangling references are tolerated but reportable.** A reference to
//!    an ID that never loads materializes no edge and fails no query; the
//!    pending reference is surfaced by
//!    [`PolicyGraph::unresolved_references`] for the loader's diagnostics.
//!
//! 4. **Build once, then publish immutably.** The graph performs no
//!    interior mutation; once construction finishes, concurrent readers can
//!    share it behind an `Arc`. Hot reload is build-new-then-swap in the
//!    embedding application.

pub mod entity;
pub mod graph;

pub use entity::{Clause, Document};
pub use graph::{ClauseHandle, DocHandle, Edge, EdgeKind, PolicyGraph, UnresolvedReference};
