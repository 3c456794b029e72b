//! # Legal Vocabulary Enums — Single Source of Truth
//!
//! Defines [`AuthorityLevel`] (the kind of instrument a provision flows from)
//! and [`ClauseStatus`] (a clause's editorial lifecycle). These are the single
//! definitions used by every crate in the workspace. The Rust compiler
//! enforces exhaustive `match`: adding a variant forces every handler in the
//! codebase to address it.
//!
//! [`ClauseStatus`] is informational metadata from the source packs. The
//! active-set algorithm is driven solely by effective dates and supersession
//! edges, never by this field.

use serde::{Deserialize, Serialize};

/// The level of legal authority behind a document or clause.
///
/// Ordered from most to least authoritative. Callers that must rank
/// conflicting provisions can compare via [`AuthorityLevel::precedence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityLevel {
    /// A provision of the constitution itself.
    ConstitutionalProvision,
    /// An act of the legislature.
    Act,
    /// A statutory rule made under an act.
    Rule,
    /// A regulation issued by a statutory body.
    Regulation,
    /// A gazette notification.
    Notification,
    /// A departmental circular.
    Circular,
    /// A non-binding guideline.
    Guideline,
    /// A press release.
    PressRelease,
    /// A published FAQ.
    Faq,
}

impl AuthorityLevel {
    /// Return all authority levels as a slice, most authoritative first.
    pub fn all() -> &'static [AuthorityLevel] {
        &[
            Self::ConstitutionalProvision,
            Self::Act,
            Self::Rule,
            Self::Regulation,
            Self::Notification,
            Self::Circular,
            Self::Guideline,
            Self::PressRelease,
            Self::Faq,
        ]
    }

    /// The total number of authority levels.
    pub const COUNT: usize = 9;

    /// Precedence rank: `0` is the most authoritative (constitutional
    /// provision), higher values are progressively weaker instruments.
    pub fn precedence(self) -> u8 {
        match self {
            Self::ConstitutionalProvision => 0,
            Self::Act => 1,
            Self::Rule => 2,
            Self::Regulation => 3,
            Self::Notification => 4,
            Self::Circular => 5,
            Self::Guideline => 6,
            Self::PressRelease => 7,
            Self::Faq => 8,
        }
    }
}

impl std::fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ConstitutionalProvision => "constitutional_provision",
            Self::Act => "act",
            Self::Rule => "rule",
            Self::Regulation => "regulation",
            Self::Notification => "notification",
            Self::Circular => "circular",
            Self::Guideline => "guideline",
            Self::PressRelease => "press_release",
            Self::Faq => "faq",
        };
        write!(f, "{s}")
    }
}

/// The editorial lifecycle status of a clause, as recorded by the pack
/// publisher.
///
/// Informational only: a clause marked `Active` that has lapsed by date is
/// still excluded from the active set, and a clause marked `Superseded`
/// whose successor is not yet in force is still included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseStatus {
    /// Drafted but not yet notified.
    Draft,
    /// In force per the publisher's records.
    Active,
    /// Text amended by a later instrument.
    Amended,
    /// Replaced by a successor clause.
    Superseded,
    /// Repealed with no successor.
    Repealed,
}

impl std::fmt::Display for ClauseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Amended => "amended",
            Self::Superseded => "superseded",
            Self::Repealed => "repealed",
        };
        write!(f, "{s}")
    }
}
