//! # data-nexus
//!
//! Resumable download of a paginated dataset from a storage API to local
//! disk.
//!
//! ## Features
//!
//! - **Limit/Offset Paging**: One GET per page, `offset = (page - 1) * page_size`
//! - **Checkpointing**: Records and last completed page persisted after every page
//! - **Safe Resume**: A restarted pull continues at the next page, never losing records
//! - **Fail Fast**: Every error aborts the run at a page boundary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use data_nexus::config::PullConfig;
//! use data_nexus::engine::PullEngine;
//! use data_nexus::pagination::Fetcher;
//! use data_nexus::state::CheckpointStore;
//!
//! #[tokio::main]
//! async fn main() -> data_nexus::Result<()> {
//!     let config = PullConfig::builder()
//!         .base_url("https://gds.example.com/apps/")
//!         .application_id("crm")
//!         .app_path("/records")
//!         .api_key("...")
//!         .trace_id("nightly")
//!         .records_field("contacts")
//!         .output_dir("data")
//!         .build()?;
//!
//!     let fetcher = Fetcher::new(&config)?;
//!     let store = CheckpointStore::for_dataset(&config.dataset());
//!     let report = PullEngine::new(fetcher, store).run().await?;
//!     println!("{} records", report.total_records);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   page n    ┌──────────────┐  commit  ┌─────────────────┐
//! │   Fetcher    │ ──────────▶ │  PullEngine  │ ───────▶ │ CheckpointStore │
//! │ limit/offset │             │ bootstrap →  │          │ <key>_<date>.json│
//! │  envelope    │ ◀────────── │   paging     │ ◀─────── │ <key>_<date>.txt │
//! └──────────────┘   fetch     └──────────────┘   load   └─────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Pull configuration and dataset naming
pub mod config;

/// HTTP client
pub mod http;

/// Limit/offset pagination and the page fetcher
pub mod pagination;

/// Checkpoint state and its file store
pub mod state;

/// Resumable pull loop
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
