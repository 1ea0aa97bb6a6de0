//! Pagination types
//!
//! Page addressing and the response envelope of the storage API.

use crate::error::{Error, Result};
use crate::state::Record;
use serde_json::{Map, Value};

/// Top-level key of the response envelope
pub const ENVELOPE_ROOT: &str = "applicationData";

/// Offset of a 1-based page: `(index - 1) * page_size`
pub fn page_offset(index: u32, page_size: u32) -> u64 {
    u64::from(index.saturating_sub(1)) * u64::from(page_size)
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page index
    pub index: u32,
    /// Offset the page was requested at
    pub offset: u64,
    /// Total page count reported alongside this page
    pub total_pages: u32,
    /// Records of this page, possibly empty
    pub records: Vec<Record>,
}

impl Page {
    /// Whether the page carried no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The parts of a response the pull cares about
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope {
    /// Value of `paging.num_pages`
    pub total_pages: u32,
    /// Records under the configured field
    pub records: Vec<Record>,
}

impl PageEnvelope {
    /// Extract the envelope from a response body.
    ///
    /// Expected shape:
    ///
    /// ```text
    /// { "applicationData": { "<application_id>": [ { "data": {
    ///     "paging": { "num_pages": N },
    ///     "<records_field>": [ ... ] } } ] } }
    /// ```
    ///
    /// Only the first element of the application list is read.
    pub fn parse(body: Value, application_id: &str, records_field: &str) -> Result<Self> {
        let Value::Object(mut root) = body else {
            return Err(Error::protocol("response body is not a JSON object"));
        };

        let mut by_app = take_object(&mut root, ENVELOPE_ROOT, "$")?;

        let entries = match by_app.remove(application_id) {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(Error::protocol(format!(
                    "'{ENVELOPE_ROOT}.{application_id}' is not an array"
                )))
            }
            None => {
                return Err(Error::protocol(format!(
                    "missing key '{application_id}' in '{ENVELOPE_ROOT}'"
                )))
            }
        };

        let Some(Value::Object(mut first)) = entries.into_iter().next() else {
            return Err(Error::protocol(format!(
                "'{ENVELOPE_ROOT}.{application_id}' has no entry object"
            )));
        };

        let data_at = format!("{ENVELOPE_ROOT}.{application_id}[0]");
        let mut data = take_object(&mut first, "data", &data_at)?;

        let data_at = format!("{data_at}.data");
        let paging = take_object(&mut data, "paging", &data_at)?;
        let total_pages = paging
            .get("num_pages")
            .ok_or_else(|| Error::protocol(format!("missing key 'num_pages' in '{data_at}.paging'")))?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                Error::protocol(format!(
                    "'{data_at}.paging.num_pages' is not a positive page count"
                ))
            })?;

        let records = match data.remove(records_field) {
            Some(Value::Array(records)) => records,
            Some(_) => {
                return Err(Error::protocol(format!(
                    "'{data_at}.{records_field}' is not an array"
                )))
            }
            None => {
                return Err(Error::protocol(format!(
                    "missing key '{records_field}' in '{data_at}'"
                )))
            }
        };

        Ok(Self {
            total_pages,
            records,
        })
    }
}

/// Remove `key` from `map`, requiring it to be an object
fn take_object(map: &mut Map<String, Value>, key: &str, at: &str) -> Result<Map<String, Value>> {
    match map.remove(key) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(Error::protocol(format!("'{at}.{key}' is not an object"))),
        None => Err(Error::protocol(format!("missing key '{key}' in '{at}'"))),
    }
}
