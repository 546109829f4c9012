//! Error types for the audit client.

/// Audit client errors.
///
/// Only resolution and submission failures abort an audit. Poll-phase
/// transport failures end polling but still yield the best-known result, so
/// they never surface here.
#[derive(Debug, thiserror::Error)]
pub enum IqError {
    /// Public application id could not be turned into an internal id.
    #[error("unable to resolve internal id for application {public_id}: {reason}")]
    Resolution { public_id: String, reason: String },

    /// Manifest submission was not accepted.
    #[error("manifest submission failed: {reason}")]
    Submission { reason: String },

    /// A completed status response could not be parsed.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// The poll task ended without reporting a terminal state.
    #[error("poll task aborted: {message}")]
    PollAborted { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl IqError {
    pub(crate) fn resolution(public_id: &str, reason: impl Into<String>) -> Self {
        Self::Resolution {
            public_id: public_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn submission(reason: impl Into<String>) -> Self {
        Self::Submission {
            reason: reason.into(),
        }
    }

    /// Whether the error came from talking to the server rather than from
    /// local configuration.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }
}

/// Result type for audit client operations.
pub type IqResult<T> = Result<T, IqError>;
