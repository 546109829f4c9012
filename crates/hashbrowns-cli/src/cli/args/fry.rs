use clap::Args;
use hashbrowns_sbom::ManifestFormat;
use std::path::PathBuf;

/// Every field is optional here: unset values fall through to the config
/// file and then to built-in defaults (see `config::resolve`).
#[derive(Args, Clone, Debug, Default)]
pub struct FryArgs {
    /// Path to a file of `<sha1>  <location>` lines
    #[arg(long, env = "HASHBROWNS_PATH")]
    pub path: Option<PathBuf>,

    /// Nexus IQ username [default: admin]
    #[arg(long, env = "HASHBROWNS_USER")]
    pub user: Option<String>,

    /// Nexus IQ token or password [default: admin123]
    #[arg(long, env = "HASHBROWNS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Nexus IQ server URL [default: http://localhost:8070]
    #[arg(long, env = "HASHBROWNS_SERVER_URL")]
    pub server_url: Option<String>,

    /// Public application id to evaluate against
    #[arg(long, env = "HASHBROWNS_APPLICATION")]
    pub application: Option<String>,

    /// Policy evaluation stage [default: develop]
    #[arg(long, env = "HASHBROWNS_STAGE")]
    pub stage: Option<String>,

    /// Poll attempts allowed after the first one [default: 300]
    #[arg(long, env = "HASHBROWNS_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Manifest serialization: xml (CycloneDX 1.1) or json (CycloneDX 1.4) [default: xml]
    #[arg(long, env = "HASHBROWNS_FORMAT")]
    pub format: Option<ManifestFormat>,

    /// Source name reported to the server [default: hashbrowns]
    #[arg(long, env = "HASHBROWNS_SOURCE")]
    pub source: Option<String>,

    #[arg(long, hide = true, env = "HASHBROWNS_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,
}
