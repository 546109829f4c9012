//! `hashbrowns fry`: parse a hash list, build a manifest, audit it.

use std::io::Write;

use anyhow::Context;
use hashbrowns_iq::{AuditClient, AuditOutcome, AuditRequest, PollOutcome, PollTermination};
use hashbrowns_sbom::{build_manifest, parse_hash_file};
use tracing::{debug, info, warn};

use crate::cli::args::{FryArgs, GlobalArgs};
use crate::config;
use crate::exit_codes::{AUDIT_ERROR, POLICY_VIOLATION, SUCCESS};

pub const PASS_MESSAGE: &str = "Wonderbar! No policy violations reported for this audit!";
pub const VIOLATION_MESSAGE: &str = "Hi, Nancy here, you have some policy violations to clean up!";

pub async fn run(args: FryArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let file = config::load(global.config.as_deref())?;
    let config = config::resolve(args, file)?;

    let entries = parse_hash_file(&config.path)
        .with_context(|| format!("failed to load hash list {}", config.path.display()))?;
    if entries.is_empty() {
        warn!(path = %config.path.display(), "hash list has no entries");
    }
    info!(
        path = %config.path.display(),
        entries = entries.len(),
        format = %config.format,
        "hash list parsed"
    );

    let manifest = build_manifest(&entries, config.format).context("failed to build manifest")?;
    let request = AuditRequest::new(
        manifest.body.as_str(),
        manifest.content_type(),
        config.application.as_str(),
        config.stage.as_str(),
    );

    let mut client = AuditClient::new(config.iq)?;
    if !global.quiet {
        client = client.with_progress(|_| {
            print!(".");
            if let Err(e) = std::io::stdout().flush() {
                debug!(error = %e, "failed to flush progress output");
            }
        });
    }

    let outcome = client.audit_with_outcome(&request).await;
    if !global.quiet {
        println!();
    }
    Ok(report(&outcome?))
}

/// Print the verdict and map it to an exit code.
fn report(poll: &PollOutcome) -> i32 {
    let outcome = poll.outcome();
    match &outcome {
        AuditOutcome::Passed => println!("{PASS_MESSAGE}"),
        AuditOutcome::PolicyViolation => println!("{VIOLATION_MESSAGE}"),
        AuditOutcome::RemoteError(message) => eprintln!("hashbrowns error: {message}"),
        AuditOutcome::Incomplete => match &poll.termination {
            PollTermination::TransportFailed(reason) => eprintln!(
                "hashbrowns error: no audit result received from the server: {reason}"
            ),
            _ => eprintln!("hashbrowns error: no audit result received from the server"),
        },
    }
    if let Some(url) = poll.result.report_url() {
        println!("Report URL: {url}");
    }
    exit_code(&outcome)
}

fn exit_code(outcome: &AuditOutcome) -> i32 {
    match outcome {
        AuditOutcome::Passed => SUCCESS,
        AuditOutcome::PolicyViolation => POLICY_VIOLATION,
        AuditOutcome::RemoteError(_) | AuditOutcome::Incomplete => AUDIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrowns_iq::AuditResult;

    #[test]
    fn test_exit_codes_per_outcome() {
        assert_eq!(exit_code(&AuditOutcome::Passed), 0);
        assert_eq!(exit_code(&AuditOutcome::PolicyViolation), 1);
        assert_eq!(exit_code(&AuditOutcome::RemoteError("boom".into())), 2);
        assert_eq!(exit_code(&AuditOutcome::Incomplete), 2);
    }

    fn poll(result: AuditResult, termination: PollTermination) -> PollOutcome {
        PollOutcome {
            result,
            attempts: 1,
            termination,
        }
    }

    #[test]
    fn test_report_exhausted_poll() {
        let outcome = poll(AuditResult::default(), PollTermination::Exhausted);
        assert_eq!(report(&outcome), AUDIT_ERROR);
    }

    #[test]
    fn test_report_transport_failure() {
        let outcome = poll(
            AuditResult::default(),
            PollTermination::TransportFailed("connection reset".to_string()),
        );
        assert_eq!(report(&outcome), AUDIT_ERROR);
    }

    #[test]
    fn test_report_completed_empty_result_passes() {
        let outcome = poll(AuditResult::default(), PollTermination::Completed);
        assert_eq!(report(&outcome), SUCCESS);
    }

    #[test]
    fn test_report_failure_action() {
        let result = AuditResult {
            policy_action: "Failure".to_string(),
            report_url: "http://host/report/1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            report(&poll(result, PollTermination::Completed)),
            POLICY_VIOLATION
        );
    }
}
