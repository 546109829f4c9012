//! Client for the Nexus IQ third-party scan API.
//!
//! One audit is three sequential phases:
//!
//! 1. resolve the public application id to the server's internal id
//! 2. submit the manifest and receive a status URL (HTTP 202)
//! 3. poll the status URL once per interval until a 200 arrives, the server
//!    becomes unreachable, or the retry budget runs out
//!
//! Phases 1 and 2 fail fast; phase 3 always ends in an [`AuditResult`].
//!
//! # Quick Start
//!
//! ```no_run
//! use hashbrowns_iq::{AuditClient, AuditOutcome, AuditRequest, IqConfig};
//!
//! # async fn example(manifest: String) -> hashbrowns_iq::IqResult<()> {
//! let client = AuditClient::new(
//!     IqConfig::default()
//!         .with_url("https://iq.example.com")
//!         .with_credentials("ci-bot", "user-token"),
//! )?;
//!
//! let request = AuditRequest::new(manifest, "application/xml", "my-app", "build");
//! let outcome = client.audit_with_outcome(&request).await?;
//! if outcome.outcome() == AuditOutcome::PolicyViolation {
//!     eprintln!("violations: {}", outcome.result.report_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{Credentials, DEFAULT_TOKEN, DEFAULT_USERNAME};
pub use client::{AuditClient, PollOutcome, PollTermination, IQ_USER_AGENT};
pub use error::{IqError, IqResult};
pub use types::{
    AuditOutcome, AuditRequest, AuditResult, IqConfig, PollProgress, SubmissionHandle,
    POLICY_ACTION_FAILURE,
};
