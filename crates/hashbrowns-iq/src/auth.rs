//! Basic-auth credentials for the IQ server.

use tracing::warn;

/// Username a fresh IQ install ships with.
pub const DEFAULT_USERNAME: &str = "admin";

/// Password a fresh IQ install ships with.
pub const DEFAULT_TOKEN: &str = "admin123";

const DEFAULT_CREDENTIALS_BANNER: &str = "\
!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!
!!!! WARNING : You are using the default username and password for Nexus IQ. !!!!
!!!! You are strongly encouraged to change these, and use a token.           !!!!
!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!";

/// Username plus password or user token, sent as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Whether these are the factory-default `admin` / `admin123` pair.
    pub fn is_default(&self) -> bool {
        self.username == DEFAULT_USERNAME && self.token == DEFAULT_TOKEN
    }

    /// Emit the default-credential banner when applicable.
    ///
    /// Returns whether a warning was emitted. Purely diagnostic.
    pub(crate) fn warn_if_default(&self) -> bool {
        if !self.is_default() {
            return false;
        }
        warn!(username = %self.username, "default IQ credentials in use");
        eprintln!("\n{DEFAULT_CREDENTIALS_BANNER}\n");
        true
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_TOKEN)
    }
}

// Keep the token out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}
