//! JSON log output for the CLI.
//!
//! Logs go to a file so stdout/stderr stay reserved for audit output. The
//! file is truncated on every run.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::cli::args::GlobalArgs;

pub const OSS_INDEX_DIR: &str = ".ossindex";
pub const DEFAULT_LOG_FILENAME: &str = "hashbrowns.combined.log";

/// Filter directive for a `-v` count.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(OSS_INDEX_DIR).join(DEFAULT_LOG_FILENAME))
}

/// Create (or truncate) the log file, creating its directory first.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Install the global subscriber. Falls back to stderr when the log file
/// cannot be opened; never fails the run.
pub fn init(global: &GlobalArgs) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(global.verbose)));

    let builder = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(false);

    let target = global.log_file.clone().or_else(default_log_path);
    let file = target.as_deref().map(open_log_file);

    let result = match file {
        Some(Ok(file)) => builder.with_writer(Mutex::new(file)).try_init(),
        _ => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(e) = result {
        eprintln!("hashbrowns: failed to initialize logging: {e}");
    }
}
