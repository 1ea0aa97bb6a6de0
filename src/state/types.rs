//! Pull state types
//!
//! The in-memory view of the two checkpoint artifacts.

use serde::Serialize;
use serde_json::Value;

/// A single record; no structure is imposed on it
pub type Record = Value;

/// Progress of a pull: the highest committed page and every record up to it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PullState {
    /// Highest page index fully persisted (0 = nothing yet)
    pub last_completed_page: u32,
    /// Records of pages `1..=last_completed_page`, in page order
    pub records: Vec<Record>,
}

/// Position of a [`PullState`] that can be restored after a failed commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark {
    page: u32,
    record_count: usize,
}

impl PullState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from already persisted progress
    pub fn resumed(last_completed_page: u32, records: Vec<Record>) -> Self {
        Self {
            last_completed_page,
            records,
        }
    }

    /// Whether no page has been committed yet
    pub fn is_fresh(&self) -> bool {
        self.last_completed_page == 0
    }

    /// Number of accumulated records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Next page to fetch
    pub fn next_page(&self) -> u32 {
        self.last_completed_page + 1
    }

    /// Current position, for [`PullState::restore`]
    pub fn watermark(&self) -> Watermark {
        Watermark {
            page: self.last_completed_page,
            record_count: self.records.len(),
        }
    }

    /// Append the records of `page` and mark it completed
    pub fn advance(&mut self, page: u32, records: Vec<Record>) {
        debug_assert_eq!(page, self.next_page(), "pages must be appended in order");
        self.records.extend(records);
        self.last_completed_page = page;
    }

    /// Mark every page up to `page` completed without adding records
    ///
    /// Used once an empty page has ended the dataset, so that a later run
    /// sees nothing left to fetch.
    pub fn close_through(&mut self, page: u32) {
        self.last_completed_page = self.last_completed_page.max(page);
    }

    /// Undo every [`PullState::advance`] since `mark` was taken
    pub fn restore(&mut self, mark: Watermark) {
        self.records.truncate(mark.record_count);
        self.last_completed_page = mark.page;
    }
}
