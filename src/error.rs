//! Error types for data-nexus
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Every error belongs to one [`ErrorKind`]. None of them is retried: a
//! failure aborts the pull at the current page boundary and the last
//! committed checkpoint stays valid for the next run.

use std::path::Path;
use thiserror::Error;

/// The main error type for data-nexus
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Protocol Errors
    // ============================================================================
    #[error("Unexpected response envelope: {message}")]
    Protocol { message: String },

    // ============================================================================
    // Checkpoint Errors
    // ============================================================================
    #[error("Corrupt checkpoint at {path}: {message}")]
    CorruptState { path: String, message: String },

    #[error("Failed to persist {path}: {message}")]
    Storage { path: String, message: String },

    // ============================================================================
    // Pull Loop Errors
    // ============================================================================
    #[error("Page {page} {operation} failed: {source}")]
    Page {
        page: u32,
        operation: PageOperation,
        #[source]
        source: Box<Error>,
    },

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid settings, detected before any I/O
    Configuration,
    /// Network or HTTP-layer failure
    Transport,
    /// Response did not have the expected envelope shape
    Protocol,
    /// Marker and data artifacts disagree on load
    CorruptState,
    /// Writing a checkpoint artifact failed
    Storage,
}

/// Step of the pull loop that failed for a given page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOperation {
    /// Fetching the page from the API
    Fetch,
    /// Committing the page to the checkpoint store
    Commit,
}

impl std::fmt::Display for PageOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => f.write_str("fetch"),
            Self::Commit => f.write_str("commit"),
        }
    }
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a protocol (envelope shape) error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a corrupt checkpoint error
    pub fn corrupt_state(path: &Path, message: impl Into<String>) -> Self {
        Self::CorruptState {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(path: &Path, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Attach the failing page and operation to an error
    pub fn at_page(self, page: u32, operation: PageOperation) -> Self {
        Self::Page {
            page,
            operation,
            source: Box::new(self),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. } => ErrorKind::Configuration,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Timeout { .. } => {
                ErrorKind::Transport
            }
            Error::Protocol { .. } => ErrorKind::Protocol,
            Error::CorruptState { .. } => ErrorKind::CorruptState,
            Error::Storage { .. } => ErrorKind::Storage,
            Error::Page { source, .. } | Error::Context { source, .. } => source.kind(),
        }
    }

    /// Page index this error was raised at, if it came from the pull loop
    pub fn page(&self) -> Option<u32> {
        match self {
            Error::Page { page, .. } => Some(*page),
            Error::Context { source, .. } => source.page(),
            _ => None,
        }
    }
}

/// Result type alias for data-nexus
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: message.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_field("api_key");
        assert_eq!(err.to_string(), "Missing required config field: api_key");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::storage(Path::new("/data/users.json"), "disk full");
        assert_eq!(err.to_string(), "Failed to persist /data/users.json: disk full");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::missing_field("x").kind(), ErrorKind::Configuration);
        assert_eq!(
            Error::invalid_value("page_size", "must be positive").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(Error::http_status(500, "").kind(), ErrorKind::Transport);
        assert_eq!(Error::Timeout { timeout_ms: 10 }.kind(), ErrorKind::Transport);
        assert_eq!(Error::protocol("missing paging").kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::corrupt_state(Path::new("a.json"), "missing").kind(),
            ErrorKind::CorruptState
        );
        assert_eq!(
            Error::storage(Path::new("a.txt"), "denied").kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_page_error_keeps_source_kind() {
        let err = Error::protocol("no data").at_page(3, PageOperation::Fetch);
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.page(), Some(3));
        assert_eq!(
            err.to_string(),
            "Page 3 fetch failed: Unexpected response envelope: no data"
        );

        let err = Error::storage(Path::new("x.json"), "denied").at_page(2, PageOperation::Commit);
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().starts_with("Page 2 commit failed"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::missing_field("api_key"));
        let with_context = result.context("outer");
        let err = with_context.unwrap_err();
        assert!(err
            .to_string()
            .contains("outer: Missing required config field: api_key"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
