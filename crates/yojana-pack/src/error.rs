//! Pack-specific error types.
//!
//! Structured errors for scheme pack loading. Per-file errors are caught by
//! the loader (the file is skipped, loading continues); only directory-level
//! I/O failure escapes [`load_dir`](crate::load_dir).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading scheme packs.
#[derive(Debug, Error)]
pub enum PackError {
    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying parser error.
        source: serde_json::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying parser error.
        source: serde_yaml::Error,
    },

    /// The file parsed but a record in it is invalid (bad date, empty ID,
    /// inverted effective range, non-JSON-compatible YAML construct).
    #[error("invalid record in {path}: {detail}")]
    InvalidRecord {
        /// The file carrying the record.
        path: PathBuf,
        /// What was wrong.
        detail: String,
    },

    /// The path has an extension this loader does not read.
    #[error("unsupported pack file extension: {path}")]
    UnsupportedExtension {
        /// The offending path.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pack operations.
pub type PackResult<T> = Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_record_display_names_file_and_detail() {
        let err = PackError::InvalidRecord {
            path: PathBuf::from("packs/pm-kisan.json"),
            detail: "clause c1: effective_to must be strictly after effective_from".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("pm-kisan.json"));
        assert!(msg.contains("strictly after"));
    }

    #[test]
    fn unsupported_extension_display() {
        let err = PackError::UnsupportedExtension {
            path: PathBuf::from("packs/readme.txt"),
        };
        assert!(format!("{err}").contains("readme.txt"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err = PackError::from(io_err);
        assert!(format!("{err}").contains("no such directory"));
    }

    #[test]
    fn pack_result_alias_works() {
        let ok: PackResult<u8> = Ok(7);
        assert_eq!(ok.unwrap(), 7);
    }
}
