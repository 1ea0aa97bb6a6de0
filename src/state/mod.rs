//! Checkpoint state module
//!
//! Tracks which pages of a pull have been persisted, so that an interrupted
//! pull resumes at the next page without losing or duplicating records.
//!
//! # Overview
//!
//! The state module provides:
//! - `PullState` - Last completed page plus the accumulated records
//! - `CheckpointStore` - Durable, ordered persistence of both artifacts

mod store;
mod types;

pub use store::CheckpointStore;
pub use types::{PullState, Record, Watermark};
