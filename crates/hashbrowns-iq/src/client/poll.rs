//! Bounded status polling.
//!
//! A [`Poller`] owns its attempt counter, so every audit call starts from
//! zero no matter how many calls share the client.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::IqResult;
use crate::types::{AuditOutcome, AuditResult, PollProgress};

use super::http::{HttpBackend, PollAttempt};

/// Observer invoked before each poll attempt.
#[derive(Clone)]
pub(crate) struct ProgressFn(pub(crate) Arc<dyn Fn(PollProgress) + Send + Sync>);

impl std::fmt::Debug for ProgressFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProgressFn")
    }
}

/// How the poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTermination {
    /// A 200 status response was received and parsed.
    Completed,
    /// `max_retries + 1` attempts were made without a completed status.
    Exhausted,
    /// The server could not be reached.
    TransportFailed(String),
}

/// Terminal state handed back to the initiating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub result: AuditResult,
    pub attempts: u32,
    pub termination: PollTermination,
}

impl PollOutcome {
    /// Classify how the audit ended. Only a completed poll carries a
    /// server verdict; every other termination is incomplete.
    pub fn outcome(&self) -> AuditOutcome {
        match self.termination {
            PollTermination::Completed => self.result.outcome(),
            PollTermination::Exhausted | PollTermination::TransportFailed(_) => {
                AuditOutcome::Incomplete
            }
        }
    }

    fn new(result: AuditResult, attempts: u32, termination: PollTermination) -> Self {
        Self {
            result,
            attempts,
            termination,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Poller {
    pub(crate) http: HttpBackend,
    pub(crate) url: String,
    pub(crate) max_retries: u32,
    pub(crate) interval: Duration,
    pub(crate) progress: Option<ProgressFn>,
}

impl Poller {
    pub(crate) async fn run(self) -> IqResult<PollOutcome> {
        // Only a completed attempt produces a result; every other exit
        // reports the default one.
        let mut attempts: u32 = 0;

        loop {
            if attempts > self.max_retries {
                warn!(
                    url = %self.url,
                    attempts,
                    max_retries = self.max_retries,
                    "poll retry budget exhausted"
                );
                return Ok(PollOutcome::new(
                    AuditResult::default(),
                    attempts,
                    PollTermination::Exhausted,
                ));
            }

            if let Some(progress) = &self.progress {
                (progress.0)(PollProgress {
                    attempt: attempts + 1,
                    max_retries: self.max_retries,
                });
            }

            let attempt = self.http.poll_status(&self.url).await?;
            attempts += 1;

            match attempt {
                PollAttempt::Completed(result) => {
                    debug!(
                        attempts,
                        policy_action = %result.policy_action,
                        is_error = result.is_error,
                        "audit status completed"
                    );
                    return Ok(PollOutcome::new(result, attempts, PollTermination::Completed));
                }
                PollAttempt::TransportFailed(message) => {
                    warn!(
                        url = %self.url,
                        attempts,
                        error = %message,
                        "status poll failed, giving up"
                    );
                    return Ok(PollOutcome::new(
                        AuditResult::default(),
                        attempts,
                        PollTermination::TransportFailed(message),
                    ));
                }
                PollAttempt::Pending(status) => {
                    debug!(attempts, status = status.as_u16(), "audit still pending");
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
