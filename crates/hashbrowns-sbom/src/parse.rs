//! `sha1sum`-style hash list parsing.
//!
//! Accepted line layout is the one `sha1sum` emits:
//!
//! ```text
//! 9987ca4f73d5ea0e534dfbf19238552df4de507e  main.go
//! 2a72a07fbc9de22308d12a32f7d33504349e63c9 *Makefile
//! ```
//!
//! Blank lines and `#` comments are skipped.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{SbomError, SbomResult};

/// Length of a hex-encoded SHA-1 digest.
pub const SHA1_HEX_LEN: usize = 40;

/// One `location, digest` pair from the hash list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashEntry {
    /// File location as written in the list.
    pub location: String,

    /// Lowercase hex SHA-1 digest.
    pub sha1: String,
}

impl HashEntry {
    pub fn new(location: impl Into<String>, sha1: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            sha1: sha1.into(),
        }
    }
}

/// Read and parse a hash list file, dropping repeated digests.
pub fn parse_hash_file(path: impl AsRef<Path>) -> SbomResult<Vec<HashEntry>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SbomError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "parsing hash list");
    parse_hash_list(file).map_err(|e| match e {
        SbomError::Io { source, .. } => SbomError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse hash list lines from any reader, dropping repeated digests.
pub fn parse_hash_list(reader: impl Read) -> SbomResult<Vec<HashEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|source| SbomError::Io {
            path: PathBuf::from("<input>"),
            source,
        })?;
        if let Some(entry) = parse_line(idx + 1, &line)? {
            entries.push(entry);
        }
    }

    Ok(dedupe(entries))
}

fn parse_line(line_no: usize, raw: &str) -> SbomResult<Option<HashEntry>> {
    let line = raw.trim_end_matches('\r');
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }

    let malformed = || SbomError::MalformedLine {
        line: line_no,
        content: line.to_string(),
    };

    let (digest, rest) = line.trim_start().split_once(' ').ok_or_else(malformed)?;
    // Text mode is `<digest>  <path>`, binary mode is `<digest> *<path>`.
    let location = rest
        .strip_prefix(' ')
        .or_else(|| rest.strip_prefix('*'))
        .unwrap_or(rest);
    if location.trim().is_empty() {
        return Err(malformed());
    }

    if digest.len() != SHA1_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SbomError::InvalidDigest {
            line: line_no,
            digest: digest.to_string(),
        });
    }

    Ok(Some(HashEntry {
        location: location.to_string(),
        sha1: digest.to_ascii_lowercase(),
    }))
}

/// Remove entries whose digest was already seen, keeping first-seen order.
pub fn dedupe(entries: Vec<HashEntry>) -> Vec<HashEntry> {
    debug!(count = entries.len(), "removing duplicate digests");
    let mut seen = HashSet::with_capacity(entries.len());
    let mut unique = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.insert(entry.sha1.clone()) {
            trace!(sha1 = %entry.sha1, location = %entry.location, "unique digest");
            unique.push(entry);
        } else {
            trace!(sha1 = %entry.sha1, location = %entry.location, "duplicate digest dropped");
        }
    }

    debug!(count = unique.len(), "finished removing duplicates");
    unique
}
