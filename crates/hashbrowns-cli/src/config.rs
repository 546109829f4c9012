//! Config file loading and flag/env/file/default layering for `fry`.
//!
//! clap already resolves flag > env; values still unset after that are taken
//! from the YAML config file, then from built-in defaults.

use anyhow::{bail, Context};
use hashbrowns_iq::{Credentials, IqConfig};
use hashbrowns_sbom::ManifestFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::cli::args::FryArgs;

pub const CONFIG_FILE_NAME: &str = ".hashbrowns.yaml";
pub const DEFAULT_STAGE: &str = "develop";

/// Contents of `~/.hashbrowns.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub format: Option<ManifestFormat>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Fully resolved settings for one `fry` run.
#[derive(Debug, Clone)]
pub struct FryConfig {
    pub path: PathBuf,
    pub application: String,
    pub stage: String,
    pub format: ManifestFormat,
    pub iq: IqConfig,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Load the config file. An explicitly named file must exist; the default
/// one is optional.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
    match explicit {
        Some(path) => load_from(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => load_from(&path),
            _ => Ok(FileConfig::default()),
        },
    }
}

fn load_from(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    info!(path = %path.display(), "using config file");

    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Layer CLI values over the file config and built-in defaults.
pub fn resolve(args: FryArgs, file: FileConfig) -> anyhow::Result<FryConfig> {
    let defaults = IqConfig::default();

    let Some(path) = args.path.or(file.path) else {
        bail!("no hash list given; set --path, HASHBROWNS_PATH or `path` in the config file");
    };
    let application = match args.application.or(file.application) {
        Some(app) if !app.trim().is_empty() => app,
        _ => bail!(
            "no application given; set --application, HASHBROWNS_APPLICATION or `application` in the config file"
        ),
    };

    let credentials = Credentials::new(
        args.user
            .or(file.user)
            .unwrap_or(defaults.credentials.username),
        args.token.or(file.token).unwrap_or(defaults.credentials.token),
    );

    let iq = IqConfig {
        server_url: args
            .server_url
            .or(file.server_url)
            .unwrap_or(defaults.server_url),
        credentials,
        max_retries: args
            .max_retries
            .or(file.max_retries)
            .unwrap_or(defaults.max_retries),
        poll_interval: args
            .poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval),
        timeout_secs: defaults.timeout_secs,
        source: args.source.or(file.source).unwrap_or(defaults.source),
    };

    Ok(FryConfig {
        path,
        application,
        stage: args
            .stage
            .or(file.stage)
            .unwrap_or_else(|| DEFAULT_STAGE.to_string()),
        format: args.format.or(file.format).unwrap_or_default(),
        iq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_args() -> FryArgs {
        FryArgs {
            path: Some(PathBuf::from("hashes.txt")),
            application: Some("my-app".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let config = resolve(minimal_args(), FileConfig::default()).unwrap();

        assert_eq!(config.path, PathBuf::from("hashes.txt"));
        assert_eq!(config.application, "my-app");
        assert_eq!(config.stage, "develop");
        assert_eq!(config.format, ManifestFormat::Xml);
        assert_eq!(config.iq.server_url, "http://localhost:8070");
        assert!(config.iq.credentials.is_default());
        assert_eq!(config.iq.max_retries, 300);
        assert_eq!(config.iq.poll_interval, Duration::from_secs(1));
        assert_eq!(config.iq.source, "hashbrowns");
    }

    #[test]
    fn test_resolve_file_fills_gaps_and_args_win() {
        let file = FileConfig {
            user: Some("file-user".to_string()),
            token: Some("file-token".to_string()),
            server_url: Some("https://iq.file".to_string()),
            stage: Some("build".to_string()),
            max_retries: Some(10),
            format: Some(ManifestFormat::Json),
            application: Some("file-app".to_string()),
            ..Default::default()
        };
        let args = FryArgs {
            max_retries: Some(2),
            ..minimal_args()
        };

        let config = resolve(args, file).unwrap();
        assert_eq!(config.application, "my-app");
        assert_eq!(config.stage, "build");
        assert_eq!(config.format, ManifestFormat::Json);
        assert_eq!(config.iq.server_url, "https://iq.file");
        assert_eq!(
            config.iq.credentials,
            Credentials::new("file-user", "file-token")
        );
        assert_eq!(config.iq.max_retries, 2);
    }

    #[test]
    fn test_resolve_requires_path() {
        let args = FryArgs {
            path: None,
            ..minimal_args()
        };
        let err = resolve(args, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--path"));
    }

    #[test]
    fn test_resolve_requires_application() {
        let args = FryArgs {
            application: Some("  ".to_string()),
            ..minimal_args()
        };
        let err = resolve(args, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--application"));
    }

    #[test]
    fn test_resolve_poll_interval_override() {
        let args = FryArgs {
            poll_interval_ms: Some(25),
            ..minimal_args()
        };
        let config = resolve(args, FileConfig::default()).unwrap();
        assert_eq!(config.iq.poll_interval, Duration::from_millis(25));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server_url: https://iq.example.com\nuser: ci-bot\nmax_retries: 12\nformat: json"
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.server_url.as_deref(), Some("https://iq.example.com"));
        assert_eq!(config.user.as_deref(), Some("ci-bot"));
        assert_eq!(config.max_retries, Some(12));
        assert_eq!(config.format, Some(ManifestFormat::Json));
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(load(Some(file.path())).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "servr_url: https://typo.example.com").unwrap();

        let err = load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("servr_url"));
    }

    #[test]
    fn test_load_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
