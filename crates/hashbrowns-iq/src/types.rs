//! Request, result and wire types for the third-party scan protocol.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;

/// Policy action the server reports when the audit should fail the build.
pub const POLICY_ACTION_FAILURE: &str = "Failure";

/// Client configuration, fixed for the lifetime of an [`crate::AuditClient`].
#[derive(Debug, Clone)]
pub struct IqConfig {
    /// Server base URL, e.g. `http://localhost:8070`.
    pub server_url: String,

    /// Basic-auth credentials sent with every request.
    pub credentials: Credentials,

    /// Poll attempts allowed after the first one.
    pub max_retries: u32,

    /// Delay between poll attempts.
    pub poll_interval: Duration,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Source name in the submission path (`.../sources/{source}`).
    pub source: String,
}

fn default_server_url() -> String {
    "http://localhost:8070".to_string()
}

fn default_max_retries() -> u32 {
    300
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_timeout() -> u64 {
    30
}

fn default_source() -> String {
    "hashbrowns".to_string()
}

impl Default for IqConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            credentials: Credentials::default(),
            max_retries: default_max_retries(),
            poll_interval: default_poll_interval(),
            timeout_secs: default_timeout(),
            source: default_source(),
        }
    }
}

impl IqConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `HASHBROWNS_SERVER_URL` | IQ server base URL |
    /// | `HASHBROWNS_USER` | Username |
    /// | `HASHBROWNS_TOKEN` | Password or user token |
    /// | `HASHBROWNS_MAX_RETRIES` | Poll retry budget |
    /// | `HASHBROWNS_SOURCE` | Source name for submissions |
    pub fn from_env() -> Self {
        let defaults = Credentials::default();
        Self {
            server_url: std::env::var("HASHBROWNS_SERVER_URL")
                .unwrap_or_else(|_| default_server_url()),
            credentials: Credentials::new(
                std::env::var("HASHBROWNS_USER").unwrap_or(defaults.username),
                std::env::var("HASHBROWNS_TOKEN").unwrap_or(defaults.token),
            ),
            max_retries: std::env::var("HASHBROWNS_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_retries),
            source: std::env::var("HASHBROWNS_SOURCE").unwrap_or_else(|_| default_source()),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.credentials = Credentials::new(username, token);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Per-call audit input.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Serialized manifest, sent as-is.
    pub manifest: String,

    /// `Content-Type` matching the manifest serialization.
    pub content_type: String,

    /// Public application id as shown in the IQ UI.
    pub application_public_id: String,

    /// Policy evaluation stage (`develop`, `build`, `release`, ...).
    pub stage: String,
}

impl AuditRequest {
    pub fn new(
        manifest: impl Into<String>,
        content_type: impl Into<String>,
        application_public_id: impl Into<String>,
        stage: impl Into<String>,
    ) -> Self {
        Self {
            manifest: manifest.into(),
            content_type: content_type.into(),
            application_public_id: application_public_id.into(),
            stage: stage.into(),
        }
    }
}

/// Terminal value of one audit call, as reported by the status endpoint.
///
/// The default value stands for "no completed status was ever seen".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    #[serde(default)]
    pub is_error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default)]
    pub policy_action: String,

    #[serde(default, rename = "reportHtmlUrl")]
    pub report_url: String,
}

/// How the CLI should read an [`AuditResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Evaluation finished without a `Failure` action.
    Passed,
    /// Evaluation finished with the `Failure` action.
    PolicyViolation,
    /// The server reported that the evaluation itself failed.
    RemoteError(String),
    /// No completed status was observed before polling stopped.
    Incomplete,
}

impl AuditResult {
    /// Classify a result the server reported as complete.
    ///
    /// Never yields [`AuditOutcome::Incomplete`]: whether a result was
    /// received at all is known only to the poll loop, see
    /// [`crate::PollOutcome::outcome`].
    pub fn outcome(&self) -> AuditOutcome {
        if self.is_error {
            let message = self
                .error_message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "server reported an audit error".to_string());
            return AuditOutcome::RemoteError(message);
        }
        if self.policy_action == POLICY_ACTION_FAILURE {
            return AuditOutcome::PolicyViolation;
        }
        AuditOutcome::Passed
    }

    /// Report link, if the server sent one.
    pub fn report_url(&self) -> Option<&str> {
        Some(self.report_url.as_str()).filter(|u| !u.is_empty())
    }
}

/// Opaque status URL identifying an in-flight analysis job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle(pub(crate) String);

impl SubmissionHandle {
    /// Wrap a status URL obtained from an earlier submission.
    pub fn new(status_url: impl Into<String>) -> Self {
        Self(status_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sent to the progress observer before each poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProgress {
    /// 1-based attempt number.
    pub attempt: u32,
    pub max_retries: u32,
}

/// Response from GET /api/v2/applications?publicId=...
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApplicationsResponse {
    #[serde(default)]
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Application {
    pub id: String,
}

/// Response from POST /api/v2/scan/applications/{id}/sources/{source}.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmissionResponse {
    #[serde(default)]
    pub status_url: Option<String>,
}
