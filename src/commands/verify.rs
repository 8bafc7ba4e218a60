//! The issue-close verification flow: extract the payout fields from the
//! environment-supplied issue, validate labels and assignee, settle the
//! final price, and leave the result files for the pipeline.

use crate::checks;
use crate::cli::VerifyArgs;
use crate::client::GithubClient;
use crate::config::Config;
use crate::error::{BountyError, Result};
use crate::report::CheckReport;
use crate::types::Issue;

pub async fn run(client: &GithubClient, config: &Config, args: &VerifyArgs) -> Result<()> {
    let issue = Issue::from_env()?;
    let rate = config.hourly_rate();

    let mut report = CheckReport::new();
    let checks_ok = checks::run_all(client, &issue, rate, &mut report).await;

    report.print();
    report.write_files(&args.success_file, &args.error_file)?;

    if checks_ok {
        println!("Checks passed, issue closed successfully!");
        Ok(())
    } else {
        println!("Checks failed, reopening issue...");
        Err(BountyError::ChecksFailed)
    }
}
