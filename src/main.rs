mod airtable;
mod checks;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod extract;
mod report;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands};
use client::GithubClient;
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bounty", &mut io::stdout());
        }
        Commands::Verify(args) => {
            let config = Config::load()?;
            let client = GithubClient::new(config.api_token()?);
            commands::verify::run(&client, &config, &args).await?;
        }
        Commands::Record(args) => {
            // Config and client construction happen inside the run so
            // their failures reach the pipeline's error file too.
            commands::record::run(&args).await?;
        }
    }

    Ok(())
}
