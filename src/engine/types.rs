//! Engine types
//!
//! Pull phases and the summary returned by a finished pull.

use serde::Serialize;
use std::time::Duration;

/// Phase of a pull run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullPhase {
    /// Nothing loaded yet
    Init,
    /// Fetching page 1 (records or metadata only)
    Bootstrap,
    /// Fetching pages after the last checkpoint
    Paging,
    /// Every page up to the reported total has been committed
    Done,
    /// A fetch or commit failed; the last checkpoint is intact
    Failed,
}

impl PullPhase {
    /// Whether the run has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for PullPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Bootstrap => "bootstrap",
            Self::Paging => "paging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful pull
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PullReport {
    /// Last completed page found on disk at start
    pub resumed_from: u32,
    /// Requests issued, including the metadata fetch of page 1 on resume
    pub pages_fetched: u32,
    /// Pages whose records were appended and committed
    pub pages_appended: u32,
    /// Records appended during this run
    pub records_appended: usize,
    /// Records in the dataset after the run
    pub total_records: usize,
    /// Marker value after the run
    pub last_completed_page: u32,
    /// Page count reported by the last response
    pub total_pages: u32,
    /// Wall-clock time of the run
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl PullReport {
    /// Whether this run started from an existing checkpoint
    pub fn was_resumed(&self) -> bool {
        self.resumed_from > 0
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
