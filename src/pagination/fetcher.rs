//! Page fetcher
//!
//! Issues one GET per page with `limit`/`offset` query parameters and the
//! storage API headers, and parses the response envelope.

use super::types::{page_offset, Page, PageEnvelope};
use crate::config::PullConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

/// Header carrying the API key
pub const HEADER_API_KEY: &str = "X-storageapi-key";
/// Header carrying the request time in Unix seconds
pub const HEADER_DATE: &str = "X-storageapi-date";
/// Header carrying the trace id
pub const HEADER_TRACE_ID: &str = "X-Storageapi-Trace-Id";

/// Anything that can produce a page by its 1-based index
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `index`; fails on transport or envelope errors
    async fn fetch_page(&self, index: u32) -> Result<Page>;
}

/// [`PageSource`] backed by the storage API
#[derive(Debug)]
pub struct Fetcher {
    client: HttpClient,
    endpoint: String,
    application_id: String,
    records_field: String,
    page_size: u32,
}

impl Fetcher {
    /// Create a fetcher from a validated config
    pub fn new(config: &PullConfig) -> Result<Self> {
        let http_config = HttpClientConfig::builder()
            .timeout(config.timeout)
            .header(HEADER_API_KEY, &config.api_key)
            .header(HEADER_TRACE_ID, &config.trace_id)
            .build();

        Ok(Self {
            client: HttpClient::with_config(http_config)?,
            endpoint: config.endpoint(),
            application_id: config.application_id.clone(),
            records_field: config.records_field.clone(),
            page_size: config.page_size,
        })
    }

    /// Endpoint every page is requested from
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Records requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Query parameters for page `index`
    pub fn page_request(&self, index: u32) -> RequestConfig {
        RequestConfig::new()
            .query("limit", self.page_size.to_string())
            .query("offset", page_offset(index, self.page_size).to_string())
            .header(HEADER_DATE, Utc::now().timestamp().to_string())
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, index: u32) -> Result<Page> {
        if index == 0 {
            return Err(Error::protocol("page indices start at 1"));
        }

        let offset = page_offset(index, self.page_size);
        debug!(
            "GET {} limit={} offset={}",
            self.endpoint, self.page_size, offset
        );

        let body: Value = self
            .client
            .get_json_with_config(&self.endpoint, self.page_request(index))
            .await?;

        let envelope = PageEnvelope::parse(body, &self.application_id, &self.records_field)?;

        Ok(Page {
            index,
            offset,
            total_pages: envelope.total_pages,
            records: envelope.records,
        })
    }
}
