//! Pagination module
//!
//! Limit/offset paging over the storage API.
//!
//! # Overview
//!
//! Page `n` is requested with `limit = page_size` and
//! `offset = (n - 1) * page_size`. Every response reports the total page
//! count, so the upper bound of a pull can move while it runs.

mod fetcher;
mod types;

pub use fetcher::{Fetcher, PageSource, HEADER_API_KEY, HEADER_DATE, HEADER_TRACE_ID};
pub use types::{page_offset, Page, PageEnvelope, ENVELOPE_ROOT};

#[cfg(test)]
mod tests;
