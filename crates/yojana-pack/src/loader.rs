//! # Directory Loader
//!
//! Builds a [`PolicyGraph`] from a directory of scheme pack files and
//! reports what happened. Loading is the only I/O in the stack and runs
//! once, synchronously, before the graph is handed to readers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use yojana_core::ContentDigest;
use yojana_graph::{Clause, Document, PolicyGraph, UnresolvedReference};

use crate::error::{PackError, PackResult};
use crate::parser::{is_pack_extension, parse_pack_content};
use crate::record::{LogicDefect, PackFileRecord};

/// What a load run did: counts, per-file snapshot fingerprints, and the
/// diagnostics that would otherwise be invisible (skipped files, logic
/// defects, dangling references).
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Pack files successfully loaded.
    pub files_loaded: usize,
    /// Pack files skipped because they failed to parse or validate.
    pub files_skipped: usize,
    /// Documents inserted into the graph.
    pub documents_loaded: usize,
    /// Clauses inserted into the graph.
    pub clauses_loaded: usize,
    /// SHA-256 fingerprint of each loaded file, keyed by file name.
    /// Together these pin down the exact rule-base snapshot in memory.
    pub file_digests: BTreeMap<String, ContentDigest>,
    /// Clauses that loaded without logic because their logic failed to
    /// parse.
    pub logic_defects: Vec<LogicDefect>,
    /// References whose target never loaded.
    pub unresolved: Vec<UnresolvedReference>,
}

/// One successfully parsed and converted pack file, not yet inserted.
struct ParsedPack {
    digest: ContentDigest,
    documents: Vec<Document>,
    clauses: Vec<Clause>,
    logic_defects: Vec<LogicDefect>,
}

/// Load every pack file in `dir` into a fresh graph.
///
/// A missing directory is created and yields an empty rule base. Files are
/// read in sorted name order; a file that fails to parse or validate is
/// warn-logged, counted, and skipped whole. After the last file the
/// unresolved-reference pass runs and its findings are recorded.
///
/// # Errors
///
/// Only directory-level I/O failure (cannot create or read `dir`) is an
/// error; per-file failures are diagnostics, never fatal.
pub fn load_dir(dir: &Path) -> PackResult<(PolicyGraph, LoadReport)> {
    let mut graph = PolicyGraph::new();
    let mut report = LoadReport::default();

    if !dir.exists() {
        tracing::info!(dir = %dir.display(), "pack directory missing, creating empty rule base");
        fs::create_dir_all(dir)?;
        return Ok((graph, report));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        if !is_pack_extension(&path) {
            tracing::debug!(path = %path.display(), "ignoring non-pack file");
            continue;
        }
        match load_pack_file(&path) {
            Ok(parsed) => {
                report.files_loaded += 1;
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    report.file_digests.insert(name.to_string(), parsed.digest);
                }
                for doc in parsed.documents {
                    graph.add_document(doc);
                    report.documents_loaded += 1;
                }
                for clause in parsed.clauses {
                    graph.add_clause(clause);
                    report.clauses_loaded += 1;
                }
                for defect in parsed.logic_defects {
                    tracing::warn!(
                        clause_id = %defect.clause_id,
                        error = %defect.detail,
                        "clause loaded without logic: logic failed to parse"
                    );
                    report.logic_defects.push(defect);
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "skipping pack file"
                );
                report.files_skipped += 1;
            }
        }
    }

    for unresolved in graph.unresolved_references() {
        tracing::warn!(
            clause_id = %unresolved.clause_id,
            kind = %unresolved.kind,
            target = %unresolved.target,
            "reference target never loaded"
        );
        report.unresolved.push(unresolved);
    }

    tracing::info!(
        files_loaded = report.files_loaded,
        files_skipped = report.files_skipped,
        documents = report.documents_loaded,
        clauses = report.clauses_loaded,
        "rule base loaded"
    );
    Ok((graph, report))
}

/// Parse and convert one pack file completely before anything is inserted,
/// so a failed file registers no partial state.
fn load_pack_file(path: &Path) -> PackResult<ParsedPack> {
    let content = fs::read_to_string(path)?;
    let digest = ContentDigest::of_text(&content);
    let value = parse_pack_content(path, &content)?;
    let record: PackFileRecord =
        serde_json::from_value(value).map_err(|e| PackError::InvalidRecord {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let mut documents = Vec::with_capacity(record.documents.len());
    for doc_record in record.documents {
        let doc = doc_record
            .into_document()
            .map_err(|e| PackError::InvalidRecord {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        documents.push(doc);
    }

    let mut clauses = Vec::with_capacity(record.clauses.len());
    let mut logic_defects = Vec::new();
    for clause_record in record.clauses {
        let (clause, defect) = clause_record
            .into_clause()
            .map_err(|e| PackError::InvalidRecord {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        clauses.push(clause);
        logic_defects.extend(defect);
    }

    Ok(ParsedPack {
        digest,
        documents,
        clauses,
        logic_defects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yojana_core::{PolicyId, Timestamp};

    fn write_pack(dir: &Path, name: &str, value: serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    fn pmkisan_pack() -> serde_json::Value {
        json!({
            "documents": [{
                "id": "pmkisan-gazette-2019-02",
                "title": "PM-KISAN Operational Guidelines",
                "policy_id": "pm-kisan",
                "doc_type": "notification",
                "date_issued": "2019-02-24",
                "clauses": ["c-pmkisan-eligibility-v1"]
            }],
            "clauses": [{
                "id": "c-pmkisan-eligibility-v1",
                "policy_id": "pm-kisan",
                "parent_doc_id": "pmkisan-gazette-2019-02",
                "authority_level": "notification",
                "effective_from": "2019-02-24",
                "status": "active",
                "text": "Landholding up to 2 hectares.",
                "logic": {"<=": [{"var": "land_holding"}, 2]},
                "tags": ["eligibility"]
            }]
        })
    }

    #[test]
    fn loads_json_pack() {
        let tmp = tempfile::tempdir().unwrap();
        write_pack(tmp.path(), "pm-kisan.json", pmkisan_pack());

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(graph.document_count(), 1);
        assert_eq!(graph.clause_count(), 1);
        assert!(report.file_digests.contains_key("pm-kisan.json"));
        assert!(report.unresolved.is_empty());
    }

    #[test]
    fn loads_yaml_pack() {
        let tmp = tempfile::tempdir().unwrap();
        let yaml = "\
documents:
  - id: pmkisan-gazette-2019-02
    title: PM-KISAN Operational Guidelines
    policy_id: pm-kisan
    doc_type: notification
    date_issued: \"2019-02-24\"
clauses:
  - id: c-pmkisan-eligibility-v1
    policy_id: pm-kisan
    parent_doc_id: pmkisan-gazette-2019-02
    authority_level: notification
    effective_from: \"2019-02-24\"
    status: active
    text: Landholding up to 2 hectares.
";
        fs::write(tmp.path().join("pm-kisan.yaml"), yaml).unwrap();

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_loaded, 1);
        assert_eq!(graph.clause_count(), 1);
    }

    #[test]
    fn missing_directory_is_created_and_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("packs");
        assert!(!dir.exists());

        let (graph, report) = load_dir(&dir).unwrap();
        assert!(dir.exists());
        assert_eq!(graph.clause_count(), 0);
        assert_eq!(report.files_loaded, 0);
    }

    #[test]
    fn malformed_file_is_skipped_and_rest_load() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("broken.json"), "{not json").unwrap();
        write_pack(tmp.path(), "pm-kisan.json", pmkisan_pack());

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(graph.clause_count(), 1);
    }

    #[test]
    fn invalid_record_skips_whole_file_with_no_partial_state() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pack = pmkisan_pack();
        // Second clause has an inverted effective range: the whole file must
        // be rejected, including the valid first document and clause.
        pack["clauses"].as_array_mut().unwrap().push(json!({
            "id": "c-bad",
            "policy_id": "pm-kisan",
            "parent_doc_id": "pmkisan-gazette-2019-02",
            "authority_level": "notification",
            "effective_from": "2019-06-01",
            "effective_to": "2019-02-24",
            "status": "active",
            "text": "Inverted range."
        }));
        write_pack(tmp.path(), "pm-kisan.json", pack);

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_skipped, 1);
        assert_eq!(graph.document_count(), 0);
        assert_eq!(graph.clause_count(), 0);
    }

    #[test]
    fn defective_logic_is_reported_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pack = pmkisan_pack();
        pack["clauses"][0]["logic"] = json!({"xor": [1, 2]});
        write_pack(tmp.path(), "pm-kisan.json", pack);

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.logic_defects.len(), 1);
        let clause = graph
            .clause(&report.logic_defects[0].clause_id)
            .unwrap();
        assert!(clause.logic.is_none());
    }

    #[test]
    fn dangling_references_are_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pack = pmkisan_pack();
        pack["clauses"][0]["superseded_by"] = json!("c-never-published");
        write_pack(tmp.path(), "pm-kisan.json", pack);

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].target, "c-never-published");
        // Tolerated: the clause is still active.
        let active = graph.get_active_clauses(
            &PolicyId::new("pm-kisan").unwrap(),
            &Timestamp::parse("2019-07-01").unwrap(),
        );
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn non_pack_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), "not a pack").unwrap();
        write_pack(tmp.path(), "pm-kisan.json", pmkisan_pack());

        let (_, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.files_skipped, 0);
    }

    #[test]
    fn later_file_overwrites_same_ids() {
        let tmp = tempfile::tempdir().unwrap();
        write_pack(tmp.path(), "a-first.json", pmkisan_pack());
        let mut revised = pmkisan_pack();
        revised["clauses"][0]["text"] = json!("Revised wording.");
        write_pack(tmp.path(), "b-second.json", revised);

        let (graph, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.files_loaded, 2);
        assert_eq!(graph.clause_count(), 1);
        let clause = graph.clauses().next().unwrap();
        assert_eq!(clause.text, "Revised wording.");
    }
}
