//! Pull engine module
//!
//! The resumable pull loop.
//!
//! # Overview
//!
//! A run moves through `Init → Bootstrap → Paging → Done`, or stops in
//! `Failed`. Page 1 is always fetched because it is the only source of the
//! total page count; on a resumed run its records are not appended again.
//! Every later page is fetched, appended and committed before the next one
//! is requested. The first error aborts the run and the checkpoint on disk
//! stays at the last committed page.

mod types;

pub use types::{PullPhase, PullReport};

use crate::error::{PageOperation, Result};
use crate::pagination::{Page, PageSource};
use crate::state::{CheckpointStore, PullState};
use std::time::Instant;
use tracing::{debug, error, info};

/// Orchestrates one pull run
pub struct PullEngine<S> {
    /// Page source
    source: S,
    /// Checkpoint store
    store: CheckpointStore,
    /// Current phase
    phase: PullPhase,
}

impl<S: PageSource> PullEngine<S> {
    /// Create a new pull engine
    pub fn new(source: S, store: CheckpointStore) -> Self {
        Self {
            source,
            store,
            phase: PullPhase::Init,
        }
    }

    /// Current phase
    pub fn phase(&self) -> PullPhase {
        self.phase
    }

    /// Get the checkpoint store
    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Get the page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the pull to completion or to the first error
    pub async fn run(&mut self) -> Result<PullReport> {
        let start = Instant::now();
        let mut report = PullReport::default();

        self.phase = PullPhase::Init;
        match self.pull(&mut report).await {
            Ok(()) => {
                self.phase = PullPhase::Done;
                report.elapsed = start.elapsed();
                info!(
                    "Pull complete: {} records through page {} of {} ({} appended this run)",
                    report.total_records,
                    report.last_completed_page,
                    report.total_pages,
                    report.records_appended
                );
                Ok(report)
            }
            Err(e) => {
                self.phase = PullPhase::Failed;
                error!("Pull aborted: {e}");
                Err(e)
            }
        }
    }

    async fn pull(&mut self, report: &mut PullReport) -> Result<()> {
        self.store.prepare().await?;
        let mut state = self.store.load().await?;
        report.resumed_from = state.last_completed_page;

        self.phase = PullPhase::Bootstrap;
        let first = self.fetch(1, report).await?;
        let mut total_pages = first.total_pages;
        report.total_pages = total_pages;

        let mut exhausted = false;
        if state.is_fresh() {
            exhausted = first.is_empty();
            self.append(&mut state, first, total_pages, report).await?;
        } else {
            info!(
                "Page history found; resuming after page {} ({} records on disk)",
                state.last_completed_page,
                state.record_count()
            );
        }

        self.phase = PullPhase::Paging;
        while !exhausted && state.last_completed_page < total_pages {
            let index = state.next_page();
            info!("Page {index} of {total_pages}");

            let page = self.fetch(index, report).await?;
            if page.total_pages != total_pages {
                info!(
                    "Total pages changed from {total_pages} to {} at page {index}",
                    page.total_pages
                );
                total_pages = page.total_pages;
                report.total_pages = total_pages;
            }

            exhausted = page.is_empty();
            self.append(&mut state, page, total_pages, report).await?;
        }

        report.last_completed_page = state.last_completed_page;
        report.total_records = state.record_count();
        Ok(())
    }

    async fn fetch(&self, index: u32, report: &mut PullReport) -> Result<Page> {
        let page = self
            .source
            .fetch_page(index)
            .await
            .map_err(|e| e.at_page(index, PageOperation::Fetch))?;
        report.pages_fetched += 1;
        debug!(
            "Fetched page {index}: {} records, {} total pages",
            page.records.len(),
            page.total_pages
        );
        Ok(page)
    }

    /// Append a page and commit; on failure the in-memory state is rewound
    ///
    /// An empty page ends the dataset: the marker is moved to `total_pages`
    /// so a later run has nothing left to fetch.
    async fn append(
        &self,
        state: &mut PullState,
        page: Page,
        total_pages: u32,
        report: &mut PullReport,
    ) -> Result<()> {
        let index = page.index;
        let count = page.records.len();
        let mark = state.watermark();

        state.advance(index, page.records);
        if count == 0 {
            info!("Page {index} returned no records; treating it as the end of the dataset");
            state.close_through(total_pages);
        }
        if let Err(e) = self.store.commit(state).await {
            state.restore(mark);
            return Err(e.at_page(index, PageOperation::Commit));
        }

        report.pages_appended += 1;
        report.records_appended += count;
        Ok(())
    }
}

impl<S> std::fmt::Debug for PullEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullEngine")
            .field("store", &self.store)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Convenience wrapper: run a pull with the given source and store
pub async fn pull<S: PageSource>(source: S, store: CheckpointStore) -> Result<PullReport> {
    PullEngine::new(source, store).run().await
}
