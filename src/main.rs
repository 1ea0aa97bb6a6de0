//! data-nexus CLI
//!
//! Pulls a paginated dataset to disk, resuming from the last checkpoint

use anyhow::Context;
use clap::Parser;
use data_nexus::cli::{load_dotenv, Cli, Runner};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Settings may come from a .env file; a missing file is fine
    let env_file = load_dotenv(None);
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match env_file {
        Ok(Some(path)) => tracing::debug!("Loaded settings from {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    Runner::new(cli).run().await.context("data pull failed")
}
