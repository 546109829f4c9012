//! Audit client: resolve application, submit manifest, poll for the verdict.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use crate::error::{IqError, IqResult};
use crate::types::{AuditRequest, AuditResult, IqConfig, PollProgress, SubmissionHandle};

mod helpers;
mod http;
mod poll;

use helpers::parse_base_url;
use http::HttpBackend;
use poll::{Poller, ProgressFn};

pub use poll::{PollOutcome, PollTermination};

/// User-Agent sent with every request.
pub const IQ_USER_AGENT: &str = concat!("hashbrowns/", env!("CARGO_PKG_VERSION"));

/// Client for the IQ third-party scan API.
///
/// Cheap to clone; clones share the connection pool but never poll state.
#[derive(Debug, Clone)]
pub struct AuditClient {
    http: HttpBackend,
    config: IqConfig,
    progress: Option<ProgressFn>,
}

impl AuditClient {
    pub fn new(config: IqConfig) -> IqResult<Self> {
        let base_url = parse_base_url(&config.server_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(IQ_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| IqError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url,
                credentials: config.credentials.clone(),
            },
            config,
            progress: None,
        })
    }

    pub fn from_env() -> IqResult<Self> {
        Self::new(IqConfig::from_env())
    }

    /// Register an observer called before every poll attempt.
    pub fn with_progress<F>(mut self, observer: F) -> Self
    where
        F: Fn(PollProgress) + Send + Sync + 'static,
    {
        self.progress = Some(ProgressFn(Arc::new(observer)));
        self
    }

    /// Run one complete audit and return its terminal result.
    ///
    /// Resolution and submission failures are returned as errors. Polling
    /// that ends without a completed status (budget exhausted, server gone)
    /// yields the default [`AuditResult`].
    pub async fn audit(&self, request: &AuditRequest) -> IqResult<AuditResult> {
        Ok(self.audit_with_outcome(request).await?.result)
    }

    /// Like [`AuditClient::audit`], also reporting how polling ended.
    pub async fn audit_with_outcome(&self, request: &AuditRequest) -> IqResult<PollOutcome> {
        self.config.credentials.warn_if_default();

        let internal_id = self
            .resolve_internal_id(&request.application_public_id)
            .await?;
        let handle = self.submit(&internal_id, request).await?;
        let outcome = self.poll(&handle).await?;

        info!(
            application = %request.application_public_id,
            stage = %request.stage,
            attempts = outcome.attempts,
            termination = ?outcome.termination,
            policy_action = %outcome.result.policy_action,
            "audit finished"
        );
        Ok(outcome)
    }

    /// Look up the internal id for a public application id.
    pub async fn resolve_internal_id(&self, public_id: &str) -> IqResult<String> {
        let internal_id = self.http.resolve_internal_id(public_id).await?;
        debug!(public_id, internal_id = %internal_id, "resolved application");
        Ok(internal_id)
    }

    /// Submit the request's manifest for evaluation under `internal_id`.
    pub async fn submit(
        &self,
        internal_id: &str,
        request: &AuditRequest,
    ) -> IqResult<SubmissionHandle> {
        let handle = self
            .http
            .submit(
                internal_id,
                &self.config.source,
                &request.stage,
                &request.manifest,
                &request.content_type,
            )
            .await?;
        debug!(status_url = handle.as_str(), "manifest accepted");
        Ok(handle)
    }

    /// Poll the job behind `handle` until it completes, the server becomes
    /// unreachable, or `max_retries + 1` attempts have been made.
    ///
    /// The loop runs as its own tokio task; this call resolves once that
    /// task reports its terminal state. Must be called within a tokio runtime.
    pub async fn poll(&self, handle: &SubmissionHandle) -> IqResult<PollOutcome> {
        let poller = Poller {
            http: self.http.clone(),
            url: self.http.status_url(handle),
            max_retries: self.config.max_retries,
            interval: self.config.poll_interval,
            progress: self.progress.clone(),
        };

        tokio::spawn(poller.run())
            .await
            .map_err(|e| IqError::PollAborted {
                message: e.to_string(),
            })?
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url.as_str()
    }

    pub fn config(&self) -> &IqConfig {
        &self.config
    }
}
