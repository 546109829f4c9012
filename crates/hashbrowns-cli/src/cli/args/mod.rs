use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod fry;
pub use fry::*;

#[derive(Parser)]
#[command(
    name = "hashbrowns",
    version,
    about = "Audit SHA-1 hash lists against Nexus IQ policy"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Cook up some hashes: audit a sha1sum-style hash list
    Fry(FryArgs),
    /// Print the version
    Version,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Log verbosity: -v warn, -vv info, -vvv debug, -vvvv trace (RUST_LOG wins when set)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file [default: ~/.hashbrowns.yaml]
    #[arg(long, global = true, env = "HASHBROWNS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file [default: ~/.ossindex/hashbrowns.combined.log]
    #[arg(long, global = true, env = "HASHBROWNS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Do not print poll progress
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
