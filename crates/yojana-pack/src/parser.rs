//! Shared JSON/YAML parsing infrastructure.
//!
//! Pack files may be JSON or YAML; both are brought into the
//! `serde_json::Value` model before typed deserialization so that one
//! pipeline handles record validation and error reporting regardless of the
//! source format.
//!
//! YAML allows constructs the JSON value model does not: non-string mapping
//! keys, anchors resolving to tagged values. Those are rejected here with a
//! per-file error rather than being coerced, so a pack that round-trips
//! through this loader is always expressible as plain JSON.

use std::path::Path;

use serde_json::Value;

use crate::error::{PackError, PackResult};

/// Parse a pack file's content into a `serde_json::Value`, dispatching on
/// the path's extension (`.json`, `.yaml`, `.yml`).
pub fn parse_pack_content(path: &Path, content: &str) -> PackResult<Value> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => serde_json::from_str(content).map_err(|e| PackError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        }),
        Some("yaml") | Some("yml") => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| PackError::YamlParse {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            yaml_to_json_value(path, yaml)
        }
        _ => Err(PackError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// Whether the loader reads files with this extension.
pub fn is_pack_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("json") | Some("yaml") | Some("yml")
    )
}

/// Convert a YAML value into the JSON value model, rejecting constructs
/// JSON cannot represent.
fn yaml_to_json_value(path: &Path, yaml: serde_yaml::Value) -> PackResult<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else {
                match n.as_f64().and_then(serde_json::Number::from_f64) {
                    Some(f) => Ok(Value::Number(f)),
                    None => Err(PackError::InvalidRecord {
                        path: path.to_path_buf(),
                        detail: format!("number {n:?} is not representable in JSON"),
                    }),
                }
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => {
            let items: PackResult<Vec<Value>> = seq
                .into_iter()
                .map(|item| yaml_to_json_value(path, item))
                .collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in map {
                let serde_yaml::Value::String(key) = key else {
                    return Err(PackError::InvalidRecord {
                        path: path.to_path_buf(),
                        detail: format!("mapping key {key:?} is not a string"),
                    });
                };
                obj.insert(key, yaml_to_json_value(path, value)?);
            }
            Ok(Value::Object(obj))
        }
        // Strip YAML tags and convert the inner value.
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(path, tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn parses_json_content() {
        let value =
            parse_pack_content(&PathBuf::from("pack.json"), r#"{"documents": [], "clauses": []}"#)
                .unwrap();
        assert_eq!(value, json!({"documents": [], "clauses": []}));
    }

    #[test]
    fn parses_yaml_content() {
        let value = parse_pack_content(
            &PathBuf::from("pack.yaml"),
            "documents: []\nclauses:\n  - id: c1\n",
        )
        .unwrap();
        assert_eq!(value, json!({"documents": [], "clauses": [{"id": "c1"}]}));
    }

    #[test]
    fn yaml_integers_stay_integers() {
        let value = parse_pack_content(&PathBuf::from("pack.yml"), "threshold: 2\n").unwrap();
        assert_eq!(value, json!({"threshold": 2}));
    }

    #[test]
    fn rejects_non_string_yaml_keys() {
        let err = parse_pack_content(&PathBuf::from("pack.yaml"), "1: one\n").unwrap_err();
        assert!(matches!(err, PackError::InvalidRecord { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_pack_content(&PathBuf::from("pack.json"), "{not json").unwrap_err();
        assert!(matches!(err, PackError::JsonParse { .. }));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_pack_content(&PathBuf::from("pack.txt"), "x").unwrap_err();
        assert!(matches!(err, PackError::UnsupportedExtension { .. }));
    }

    #[test]
    fn pack_extension_check() {
        assert!(is_pack_extension(&PathBuf::from("a.json")));
        assert!(is_pack_extension(&PathBuf::from("a.YAML")));
        assert!(is_pack_extension(&PathBuf::from("a.yml")));
        assert!(!is_pack_extension(&PathBuf::from("a.txt")));
        assert!(!is_pack_extension(&PathBuf::from("a")));
    }
}
