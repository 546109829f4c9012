use clap::Parser;

mod cli;
mod config;
pub mod exit_codes;
mod logging;

use cli::args::Cli;
use cli::commands::dispatch;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(&cli.global);

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "fatal");
            eprintln!("hashbrowns error: {e:#}");
            exit_codes::AUDIT_ERROR
        }
    };
    std::process::exit(code);
}
