//! HTTP layer: request building, status mapping, PollAttempt.
//!
//! This is the ONLY place for status code handling. client/mod.rs and
//! client/poll.rs never interpret status codes.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::{IqError, IqResult};
use crate::types::{ApplicationsResponse, AuditResult, SubmissionHandle, SubmissionResponse};

use super::helpers::{applications_url, status_url, submission_url};

/// Longest response body excerpt carried into error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// Outcome of a single status request.
#[derive(Debug)]
pub(crate) enum PollAttempt {
    /// 200 with a parseable body.
    Completed(AuditResult),
    /// Any other status; the job is not reported as finished.
    Pending(StatusCode),
    /// No HTTP response at all.
    TransportFailed(String),
}

/// HTTP backend for making requests (holds reqwest client, base URL, credentials).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) credentials: Credentials,
}

impl HttpBackend {
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.token))
    }

    /// GET applications by public id; 200 with a non-empty list => first id.
    pub(crate) async fn resolve_internal_id(&self, public_id: &str) -> IqResult<String> {
        let url = applications_url(&self.base_url, public_id);
        debug!(url = %url, "resolving internal application id");

        let response = self
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| IqError::resolution(public_id, format!("request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(IqError::resolution(
                public_id,
                format!("unexpected status {}", status.as_u16()),
            ));
        }

        let body: ApplicationsResponse = response.json().await.map_err(|e| {
            IqError::resolution(public_id, format!("malformed applications response: {e}"))
        })?;

        body.applications
            .into_iter()
            .next()
            .map(|app| app.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| IqError::resolution(public_id, "no internal id for public id"))
    }

    /// POST manifest; 202 with a non-empty `statusUrl` => handle.
    pub(crate) async fn submit(
        &self,
        internal_id: &str,
        source: &str,
        stage: &str,
        manifest: &str,
        content_type: &str,
    ) -> IqResult<SubmissionHandle> {
        let url = submission_url(&self.base_url, internal_id, source, stage);
        debug!(url = %url, content_type, bytes = manifest.len(), "submitting manifest");

        let response = self
            .client
            .post(url.as_str())
            .basic_auth(&self.credentials.username, Some(&self.credentials.token))
            .header(CONTENT_TYPE, content_type)
            .body(manifest.to_string())
            .send()
            .await
            .map_err(|e| IqError::submission(format!("request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            return Err(IqError::submission(format!(
                "unexpected status {}{}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let body: SubmissionResponse = response
            .json()
            .await
            .map_err(|e| IqError::submission(format!("malformed submission response: {e}")))?;

        body.status_url
            .filter(|s| !s.trim().is_empty())
            .map(SubmissionHandle)
            .ok_or_else(|| IqError::submission("response carried no status url"))
    }

    /// Absolute URL to poll for a submission handle.
    pub(crate) fn status_url(&self, handle: &SubmissionHandle) -> String {
        status_url(&self.base_url, handle.as_str())
    }

    /// GET status once. A 200 whose body does not parse is an error.
    pub(crate) async fn poll_status(&self, url: &str) -> IqResult<PollAttempt> {
        let response = match self.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(PollAttempt::TransportFailed(e.to_string())),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(PollAttempt::Pending(status));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(PollAttempt::TransportFailed(format!(
                    "failed to read status body: {e}"
                )))
            }
        };

        serde_json::from_str::<AuditResult>(&body)
            .map(PollAttempt::Completed)
            .map_err(|e| IqError::InvalidResponse {
                url: url.to_string(),
                message: format!("failed to parse status response: {e}"),
            })
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body.chars().take(BODY_EXCERPT_LEN).collect::<String>())
    }
}
