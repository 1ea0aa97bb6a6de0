//! CLI commands and argument parsing
//!
//! Every option falls back to an environment variable. The binary loads a
//! `.env` file from the working directory first, so a `.env` deployment
//! keeps working without flags.

use crate::error::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Resumable download of a paginated storage API dataset
#[derive(Parser, Debug)]
#[command(name = "data-nexus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "GDS_BASE_URL", default_value = "")]
    pub base_url: String,

    /// Application identifier (URL segment and envelope key)
    #[arg(long, global = true, env = "APPLICATION_ID", default_value = "")]
    pub application_id: String,

    /// API path appended after the application identifier
    #[arg(long, global = true, env = "APP_URL", default_value = "")]
    pub app_path: String,

    /// API key
    #[arg(long, global = true, env = "KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Trace id sent with every request
    #[arg(long, global = true, env = "TRACE_ID", default_value = "")]
    pub trace_id: String,

    /// Field of the response data holding the records; also names the output files
    #[arg(long, global = true, env = "RESPONSE_KEY", default_value = "")]
    pub records_field: String,

    /// Directory for the records and page marker files
    #[arg(long, global = true, env = "FOLDER", default_value = "")]
    pub output_dir: PathBuf,

    /// Records per page
    #[arg(long, global = true, env = "PAGE_SIZE", default_value_t = crate::config::DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Dataset date (YYYY-MM-DD); defaults to today in UTC
    #[arg(long, global = true)]
    pub date: Option<chrono::NaiveDate>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Download the dataset, resuming from the last checkpoint
    Pull,

    /// Print the checkpoint of the dataset as JSON
    Status,
}

/// Load a `.env` file into the process environment
///
/// With no path, `.env` is searched for from the working directory upwards.
/// Variables already set in the environment are kept. Returns the loaded
/// file, or `None` when there is none.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(Error::invalid_value(".env", e.to_string())),
    }
}
