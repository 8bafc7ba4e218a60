use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "bounty")]
#[command(about = "CI checks for a bounty-tracking issue workflow", version)]
#[command(after_help = "EXAMPLES:
    bounty verify                     Verify a closed issue and settle its payout
    bounty record --expected-status Done   Push the issue's project data to the tracking table
    bounty completions bash           Generate shell completions

Issue data is read from the environment the pipeline provides:
ISSUE_NUMBER, ISSUE_TITLE, ISSUE_BODY, ISSUE_LABELS, ISSUE_ASSIGNEES,
REPOSITORY, GITHUB_TOKEN.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show the full error cause chain on failure
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a closed issue's payout preconditions and settle the price
    #[command(after_help = "EXAMPLES:
    bounty verify
    bounty verify --success-file out/passed.txt --error-file out/failed.txt")]
    Verify(VerifyArgs),
    /// Record the issue's project fields in the external tracking table
    #[command(after_help = "EXAMPLES:
    bounty record --expected-status Done
    EXPECTED_STATUS=Done bounty record")]
    Record(RecordArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    bounty completions bash > ~/.bash_completion.d/bounty
    bounty completions zsh > ~/.zfunc/_bounty")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
pub struct VerifyArgs {
    /// File listing the checks that passed
    #[arg(long, default_value = "success_messages.txt")]
    pub success_file: PathBuf,

    /// File listing the failure reasons (written only on failure)
    #[arg(long, default_value = "error_messages.txt")]
    pub error_file: PathBuf,
}

#[derive(Args)]
pub struct RecordArgs {
    /// Project status the issue must carry to be submitted
    /// (falls back to the EXPECTED_STATUS env var)
    #[arg(long)]
    pub expected_status: Option<String>,

    /// File listing the steps that passed
    #[arg(long, default_value = "success_messages.txt")]
    pub success_file: PathBuf,

    /// File listing the failure reasons (written only on failure)
    #[arg(long, default_value = "error_messages.txt")]
    pub error_file: PathBuf,
}
