//! Hash list parsing and audit manifest generation.
//!
//! This crate turns a `sha1sum`-style listing into the payload that
//! `hashbrowns-iq` submits for policy evaluation:
//!
//! - [`parse_hash_file`] / [`parse_hash_list`] read `<digest>  <location>` lines
//!   and drop repeated digests (first occurrence wins)
//! - [`build_manifest`] renders the entries as a CycloneDX bill of materials
//!
//! # Quick Start
//!
//! ```no_run
//! use hashbrowns_sbom::{build_manifest, parse_hash_file, ManifestFormat};
//!
//! # fn example() -> hashbrowns_sbom::SbomResult<()> {
//! let entries = parse_hash_file("checksums.txt")?;
//! let manifest = build_manifest(&entries, ManifestFormat::Xml)?;
//! println!("{} bytes of {}", manifest.body.len(), manifest.content_type());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod manifest;
pub mod parse;

pub use error::{SbomError, SbomResult};
pub use manifest::{build_manifest, Manifest, ManifestFormat};
pub use parse::{dedupe, parse_hash_file, parse_hash_list, HashEntry, SHA1_HEX_LEN};
