#![deny(missing_docs)]

//! # yojana-core — Foundational Types for the Yojana Stack
//!
//! This crate defines the foundational types that every other crate in the
//! workspace depends on. It has no internal crate dependencies, only `serde`,
//! `serde_json`, `thiserror`, `chrono`, and `sha2` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`DocumentId`] where a [`ClauseId`]
//!    is expected.
//!
//! 2. **UTC-only timestamps.** Gazette dates arrive in a handful of fixed
//!    textual formats and are normalized to UTC at parse time. Local time is
//!    a presentation concern for the consuming application.
//!
//! 3. **Closed enums for legal vocabulary.** [`AuthorityLevel`] and
//!    [`ClauseStatus`] are single definitions with exhaustive `match`
//!    everywhere; adding a variant is a compile error until every handler
//!    addresses it.
//!
//! 4. **[`YojanaError`] hierarchy.** Structured errors with `thiserror`: no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod authority;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use authority::{AuthorityLevel, ClauseStatus};
pub use digest::{sha256_hex, ContentDigest};
pub use error::{ValidationError, YojanaError};
pub use identity::{ClauseId, DocumentId, PolicyId};
pub use temporal::Timestamp;
