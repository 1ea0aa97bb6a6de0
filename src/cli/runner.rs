//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{DatasetLocation, PullConfig};
use crate::engine::{PullEngine, PullReport};
use crate::error::{Result, ResultExt};
use crate::pagination::Fetcher;
use crate::state::CheckpointStore;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Checkpoint summary printed by `status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointStatus {
    /// Records artifact path
    pub data_path: String,
    /// Marker artifact path
    pub marker_path: String,
    /// Last completed page (0 = not started)
    pub last_completed_page: u32,
    /// Records on disk
    pub records: usize,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command; `pull` when none was given
    pub async fn run(&self) -> Result<()> {
        match self.cli.command.unwrap_or(Commands::Pull) {
            Commands::Pull => {
                let report = self.pull().await?;
                println!("{}", to_json(&report));
                println!("Completed!");
                Ok(())
            }
            Commands::Status => {
                let status = self.status().await?;
                println!("{}", to_json(&status));
                Ok(())
            }
        }
    }

    fn date(&self) -> NaiveDate {
        self.cli.date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Build the validated pull config from the parsed arguments
    pub fn pull_config(&self) -> Result<PullConfig> {
        PullConfig::builder()
            .base_url(&self.cli.base_url)
            .application_id(&self.cli.application_id)
            .app_path(&self.cli.app_path)
            .api_key(&self.cli.api_key)
            .trace_id(&self.cli.trace_id)
            .records_field(&self.cli.records_field)
            .output_dir(&self.cli.output_dir)
            .page_size(self.cli.page_size)
            .timeout(Duration::from_secs(self.cli.timeout_secs))
            .date(self.date())
            .build()
    }

    /// Run the resumable pull
    pub async fn pull(&self) -> Result<PullReport> {
        let config = self.pull_config()?;
        let dataset = config.dataset();

        info!("Begin data pull");
        info!(
            "{} limit={} -> {}",
            config.endpoint(),
            config.page_size,
            dataset.data_path().display()
        );

        let fetcher = Fetcher::new(&config).context("Failed to build HTTP client")?;
        let store = CheckpointStore::for_dataset(&dataset);
        PullEngine::new(fetcher, store).run().await
    }

    /// Read the checkpoint of the selected dataset
    pub async fn status(&self) -> Result<CheckpointStatus> {
        let dataset =
            DatasetLocation::validated(&self.cli.output_dir, &self.cli.records_field, self.date())?;
        let store = CheckpointStore::for_dataset(&dataset);
        let state = store.load().await?;

        Ok(CheckpointStatus {
            data_path: store.data_path().display().to_string(),
            marker_path: store.marker_path().display().to_string(),
            last_completed_page: state.last_completed_page,
            records: state.record_count(),
        })
    }
}

fn to_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use clap::Parser;
    use serde_json::json;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["data-nexus"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_pull_config_requires_every_field() {
        let runner = Runner::new(cli(&[
            "--base-url",
            "https://api.example.com/",
            "--application-id",
            "crm",
            "--app-path",
            "/records",
            "--api-key",
            "k",
            "--trace-id",
            "t",
            "--records-field",
            "contacts",
            "--output-dir",
            "out",
        ]));
        assert!(runner.pull_config().is_ok());

        let runner = Runner::new(cli(&[
            "--base-url",
            "https://api.example.com/",
            "--application-id",
            "crm",
            "--app-path",
            "/records",
            "--api-key",
            " ",
            "--trace-id",
            "t",
            "--records-field",
            "contacts",
            "--output-dir",
            "out",
        ]));
        let err = runner.pull_config().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_status_reads_checkpoint() {
        let dir = tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        std::fs::write(dir.path().join("contacts_2024-06-01.txt"), "2").unwrap();
        std::fs::write(
            dir.path().join("contacts_2024-06-01.json"),
            json!([1, 2, 3]).to_string(),
        )
        .unwrap();

        let runner = Runner::new(cli(&[
            "--records-field",
            "contacts",
            "--output-dir",
            out,
            "--date",
            "2024-06-01",
            "status",
        ]));
        let status = runner.status().await.unwrap();

        assert_eq!(status.last_completed_page, 2);
        assert_eq!(status.records, 3);
        assert!(status.data_path.ends_with("contacts_2024-06-01.json"));
    }

    #[tokio::test]
    async fn test_status_of_unstarted_dataset() {
        let dir = tempdir().unwrap();
        let runner = Runner::new(cli(&[
            "--records-field",
            "contacts",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ]));
        let status = runner.status().await.unwrap();
        assert_eq!(status.last_completed_page, 0);
        assert_eq!(status.records, 0);
    }
}
