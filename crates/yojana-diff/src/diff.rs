//! # Word-Level Alignment & Change Classification
//!
//! [`generate_diff`] aligns two token sequences with a longest-common-
//! subsequence dynamic program, groups the result into contiguous blocks,
//! tallies token-level metrics, and classifies the overall change into a
//! one-line human summary.

use serde::{Deserialize, Serialize};

/// How a block of tokens changed between the two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffTag {
    /// Tokens present in both versions.
    Unchanged,
    /// Tokens present only in the new version.
    Insertion,
    /// Tokens present only in the old version.
    Deletion,
    /// A contiguous replacement of old tokens by new tokens.
    Modification,
}

impl std::fmt::Display for DiffTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unchanged => "unchanged",
            Self::Insertion => "insertion",
            Self::Deletion => "deletion",
            Self::Modification => "modification",
        };
        write!(f, "{s}")
    }
}

/// One contiguous block of the alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffBlock {
    /// The block's classification.
    pub tag: DiffTag,
    /// The old version's tokens in this block (empty for insertions).
    pub old_tokens: Vec<String>,
    /// The new version's tokens in this block (empty for deletions).
    pub new_tokens: Vec<String>,
}

/// Token-level change tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffMetrics {
    /// Tokens present only in the new version.
    pub added: usize,
    /// Tokens present only in the old version.
    pub removed: usize,
    /// Tokens common to both versions.
    pub unchanged: usize,
}

/// The full result of diffing two clause texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// The aligned blocks, in text order.
    pub blocks: Vec<DiffBlock>,
    /// Token-level tallies.
    pub metrics: DiffMetrics,
    /// One-line classification of the change.
    pub human_summary: String,
}

/// Diff two clause texts at word level.
pub fn generate_diff(old_text: &str, new_text: &str) -> DiffReport {
    let old: Vec<&str> = old_text.split_whitespace().collect();
    let new: Vec<&str> = new_text.split_whitespace().collect();
    let blocks = align(&old, &new);
    let metrics = tally(&blocks);
    let human_summary = summarize(&blocks, &metrics);
    DiffReport {
        blocks,
        metrics,
        human_summary,
    }
}

/// LCS opcode decomposition, grouped into blocks. When the first tokens of
/// both remainders are equal, matching them is always optimal, so the walk
/// takes the diagonal greedily and only consults the table on mismatch.
fn align(old: &[&str], new: &[&str]) -> Vec<DiffBlock> {
    let m = old.len();
    let n = new.len();
    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut blocks = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < m || j < n {
        if i < m && j < n && old[i] == new[j] {
            let mut tokens = Vec::new();
            while i < m && j < n && old[i] == new[j] {
                tokens.push(old[i].to_string());
                i += 1;
                j += 1;
            }
            blocks.push(DiffBlock {
                tag: DiffTag::Unchanged,
                old_tokens: tokens.clone(),
                new_tokens: tokens,
            });
            continue;
        }

        // A maximal run of non-matching positions becomes one block.
        let mut deleted = Vec::new();
        let mut inserted = Vec::new();
        while (i < m || j < n) && !(i < m && j < n && old[i] == new[j]) {
            if i < m && (j >= n || lcs[i + 1][j] >= lcs[i][j + 1]) {
                deleted.push(old[i].to_string());
                i += 1;
            } else {
                inserted.push(new[j].to_string());
                j += 1;
            }
        }
        let tag = match (deleted.is_empty(), inserted.is_empty()) {
            (false, false) => DiffTag::Modification,
            (false, true) => DiffTag::Deletion,
            (true, false) => DiffTag::Insertion,
            (true, true) => continue,
        };
        blocks.push(DiffBlock {
            tag,
            old_tokens: deleted,
            new_tokens: inserted,
        });
    }
    blocks
}

fn tally(blocks: &[DiffBlock]) -> DiffMetrics {
    let mut metrics = DiffMetrics::default();
    for block in blocks {
        match block.tag {
            DiffTag::Unchanged => metrics.unchanged += block.old_tokens.len(),
            DiffTag::Insertion => metrics.added += block.new_tokens.len(),
            DiffTag::Deletion => metrics.removed += block.old_tokens.len(),
            DiffTag::Modification => {
                metrics.added += block.new_tokens.len();
                metrics.removed += block.old_tokens.len();
            }
        }
    }
    metrics
}

fn summarize(blocks: &[DiffBlock], metrics: &DiffMetrics) -> String {
    if metrics.added == 0 && metrics.removed == 0 {
        return "No significant textual changes.".to_string();
    }
    if metrics.added > 0 && metrics.removed == 0 {
        return "New requirements or benefits added.".to_string();
    }
    if metrics.removed > 0 && metrics.added == 0 {
        return "Some provisions were removed.".to_string();
    }

    // Both sides changed: the first modification block with a parseable
    // number on each side decides the numeric direction.
    for block in blocks {
        if block.tag != DiffTag::Modification {
            continue;
        }
        let old_num = first_number(&block.old_tokens);
        let new_num = first_number(&block.new_tokens);
        if let (Some(old), Some(new)) = (old_num, new_num) {
            if new > old {
                return format!(
                    "Value increased from {} to {}.",
                    format_number(old),
                    format_number(new)
                );
            }
            if new < old {
                return format!(
                    "Value decreased from {} to {}.",
                    format_number(old),
                    format_number(new)
                );
            }
            break;
        }
    }
    "Existing clauses modified.".to_string()
}

fn first_number(tokens: &[String]) -> Option<f64> {
    tokens.iter().find_map(|t| parse_numeric_token(t))
}

/// Parse a token as a number, tolerating surrounding punctuation
/// (`"2,"`, `"(5)"`, `"50%"`).
fn parse_numeric_token(token: &str) -> Option<f64> {
    let stripped =
        token.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '(' | ')' | '"' | '\'' | '%'));
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
