//! HTTP client module
//!
//! Thin wrapper over `reqwest` used by the page fetcher.
//!
//! # Features
//!
//! - **Default Headers**: Applied to every request
//! - **Per-Request Config**: Query parameters and extra headers
//! - **Error Classification**: Timeouts and non-success statuses become typed errors
//!
//! The client never retries; a failed request is returned to the caller.

mod client;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
