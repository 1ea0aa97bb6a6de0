//! CLI module
//!
//! Command-line interface for running pulls.
//!
//! # Commands
//!
//! - `pull` - Download the dataset, resuming from the last checkpoint (default)
//! - `status` - Show the checkpoint of a dataset without contacting the API

mod commands;
mod runner;

pub use commands::{load_dotenv, Cli, Commands};
pub use runner::{CheckpointStatus, Runner};
