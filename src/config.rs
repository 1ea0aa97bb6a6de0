//! Pull configuration
//!
//! `PullConfig` is built once at the process boundary, validated eagerly and
//! then handed by reference to the fetcher and the checkpoint store. Nothing
//! in the library reads the environment.

use crate::error::{Error, Result};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Dataset Location
// ============================================================================

/// Where the two checkpoint artifacts of one logical dataset live.
///
/// Artifacts are named `<key>_<YYYY-MM-DD>.json` (records) and
/// `<key>_<YYYY-MM-DD>.txt` (last completed page), so each calendar day is a
/// separate dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    /// Directory holding the artifacts
    pub output_dir: PathBuf,
    /// Dataset key (the records field name)
    pub key: String,
    /// Calendar date of the dataset
    pub date: NaiveDate,
}

impl DatasetLocation {
    /// Create a location for the given directory, key and date
    pub fn new(output_dir: impl Into<PathBuf>, key: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            output_dir: output_dir.into(),
            key: key.into(),
            date,
        }
    }

    /// Create a location validating that the directory and key are not blank
    pub fn validated(output_dir: &Path, key: &str, date: NaiveDate) -> Result<Self> {
        if output_dir.as_os_str().is_empty() || is_blank(&output_dir.to_string_lossy()) {
            return Err(Error::missing_field("output_dir"));
        }
        if is_blank(key) {
            return Err(Error::missing_field("records_field"));
        }
        Ok(Self::new(output_dir, key.trim(), date))
    }

    fn file_stem(&self) -> String {
        format!("{}_{}", self.key, self.date.format("%Y-%m-%d"))
    }

    /// Path of the accumulated-records artifact
    pub fn data_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.file_stem()))
    }

    /// Path of the last-completed-page marker artifact
    pub fn marker_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.txt", self.file_stem()))
    }
}

// ============================================================================
// Pull Config
// ============================================================================

/// Immutable settings for one pull run
#[derive(Clone)]
pub struct PullConfig {
    /// API base URL (e.g. `https://gds.example.com/apps/`)
    pub base_url: String,
    /// Application identifier; part of the URL and the envelope key
    pub application_id: String,
    /// Path suffix appended after the application identifier
    pub app_path: String,
    /// Opaque API key sent as `X-storageapi-key`
    pub api_key: String,
    /// Trace identifier sent as `X-Storageapi-Trace-Id`
    pub trace_id: String,
    /// Field of the page data holding the records
    pub records_field: String,
    /// Directory for the checkpoint artifacts
    pub output_dir: PathBuf,
    /// Records per page (`limit`)
    pub page_size: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Dataset date
    pub date: NaiveDate,
}

impl PullConfig {
    /// Create a new config builder
    pub fn builder() -> PullConfigBuilder {
        PullConfigBuilder::default()
    }

    /// Full endpoint URL: base URL, application id and path, concatenated
    pub fn endpoint(&self) -> String {
        format!("{}{}{}", self.base_url, self.application_id, self.app_path)
    }

    /// Location of this run's checkpoint artifacts
    pub fn dataset(&self) -> DatasetLocation {
        DatasetLocation::new(&self.output_dir, &self.records_field, self.date)
    }

    /// Check every required option, failing on the first blank or invalid one
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("base_url", &self.base_url),
            ("application_id", &self.application_id),
            ("app_path", &self.app_path),
            ("api_key", &self.api_key),
            ("trace_id", &self.trace_id),
            ("records_field", &self.records_field),
        ];
        for (field, value) in required {
            if is_blank(value) {
                return Err(Error::missing_field(field));
            }
        }

        if is_blank(&self.output_dir.to_string_lossy()) {
            return Err(Error::missing_field("output_dir"));
        }

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        if self.timeout.is_zero() {
            return Err(Error::invalid_value("timeout", "must be greater than zero"));
        }

        Url::parse(&self.endpoint())
            .map_err(|e| Error::invalid_value("base_url", format!("{}: {e}", self.endpoint())))?;

        Ok(())
    }
}

impl std::fmt::Debug for PullConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullConfig")
            .field("base_url", &self.base_url)
            .field("application_id", &self.application_id)
            .field("app_path", &self.app_path)
            .field("api_key", &"***")
            .field("trace_id", &self.trace_id)
            .field("records_field", &self.records_field)
            .field("output_dir", &self.output_dir)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("date", &self.date)
            .finish()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Builder for [`PullConfig`]
#[derive(Debug, Default)]
pub struct PullConfigBuilder {
    base_url: String,
    application_id: String,
    app_path: String,
    api_key: String,
    trace_id: String,
    records_field: String,
    output_dir: PathBuf,
    page_size: Option<u32>,
    timeout: Option<Duration>,
    date: Option<NaiveDate>,
}

impl PullConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the application identifier
    pub fn application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = id.into();
        self
    }

    /// Set the API path suffix
    pub fn app_path(mut self, path: impl Into<String>) -> Self {
        self.app_path = path.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the trace id
    pub fn trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = id.into();
        self
    }

    /// Set the records field name
    pub fn records_field(mut self, field: impl Into<String>) -> Self {
        self.records_field = field.into();
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the page size
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the dataset date (defaults to today, UTC)
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<PullConfig> {
        let config = PullConfig {
            base_url: self.base_url,
            application_id: self.application_id,
            app_path: self.app_path,
            api_key: self.api_key,
            trace_id: self.trace_id,
            records_field: self.records_field,
            output_dir: self.output_dir,
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
        };
        config.validate()?;
        Ok(config)
    }
}
