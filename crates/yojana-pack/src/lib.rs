#![deny(missing_docs)]

//! # yojana-pack — Scheme Pack Loader
//!
//! Reads a directory of structured policy-data files ("scheme packs") into
//! the policy graph, once, at process start. Each pack file carries a
//! `documents` array and a `clauses` array; JSON and YAML are accepted, and
//! YAML is converted to the JSON value model before typed deserialization so
//! both formats flow through one pipeline.
//!
//! ## Loading semantics
//!
//! - A missing directory is created and treated as an empty rule base.
//! - A file that fails to parse, or whose records fail validation, is
//!   warn-logged and skipped whole; a failed file registers no partial
//!   state. Loading always continues with the remaining files.
//! - A clause whose `logic` fails AST parsing still loads, without logic
//!   (fail-closed), and the defect is recorded in the [`LoadReport`].
//! - After the last file, every reference that never resolved is
//!   warn-logged and recorded: dangling references are tolerated by the
//!   graph but never silent.
//!
//! The result is owned by the caller as a [`PolicyKnowledgeBase`]: no
//! process-wide singletons. Publish it behind an `Arc` once built; to pick
//! up changed packs, build a fresh instance and swap the reference.

pub mod base;
pub mod error;
pub mod loader;
pub mod parser;
pub mod record;

pub use base::{EligibilityVerdict, PolicyKnowledgeBase};
pub use error::{PackError, PackResult};
pub use loader::{load_dir, LoadReport};
pub use record::{ClauseRecord, DocumentRecord, LogicDefect, PackFileRecord};
