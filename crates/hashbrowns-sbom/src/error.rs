//! Error types for hash list parsing and manifest generation.

use std::path::PathBuf;

/// Hash list and manifest errors.
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// Hash list could not be opened or read.
    #[error("failed to read hash list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Line is not in `<digest>  <location>` form.
    #[error("line {line}: expected `<sha1>  <location>`, got {content:?}")]
    MalformedLine { line: usize, content: String },

    /// Digest is not 40 hex characters.
    #[error("line {line}: invalid sha1 digest {digest:?}")]
    InvalidDigest { line: usize, digest: String },

    /// Unknown manifest format name.
    #[error("unknown manifest format: {0} (expected xml or json)")]
    UnknownFormat(String),

    /// Manifest serialization failed.
    #[error("failed to serialize manifest: {message}")]
    Serialize { message: String },
}

impl From<serde_json::Error> for SbomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

/// Result type for hash list and manifest operations.
pub type SbomResult<T> = Result<T, SbomError>;
