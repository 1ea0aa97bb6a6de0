//! Tests for pagination module

use super::*;
use crate::config::PullConfig;
use crate::error::{Error, ErrorKind};
use chrono::NaiveDate;
use serde_json::{json, Value};
use test_case::test_case;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(total_pages: u64, records: Value) -> Value {
    json!({
        "applicationData": {
            "crm": [{
                "data": {
                    "paging": { "num_pages": total_pages },
                    "contacts": records
                }
            }]
        }
    })
}

fn config_for(server: &MockServer, page_size: u32) -> PullConfig {
    PullConfig::builder()
        .base_url(format!("{}/apps/", server.uri()))
        .application_id("crm")
        .app_path("/records")
        .api_key("key-123")
        .trace_id("trace-abc")
        .records_field("contacts")
        .output_dir("/tmp/unused")
        .page_size(page_size)
        .date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()
        .unwrap()
}

// ============================================================================
// Page Math Tests
// ============================================================================

#[test_case(1, 100 => 0 ; "first page starts at zero")]
#[test_case(2, 100 => 100 ; "second page")]
#[test_case(3, 100 => 200 ; "third page")]
#[test_case(5, 25 => 100 ; "custom page size")]
#[test_case(1, 1 => 0 ; "unit page size")]
fn test_page_offset(index: u32, page_size: u32) -> u64 {
    page_offset(index, page_size)
}

#[test]
fn test_page_offset_does_not_overflow() {
    assert_eq!(
        page_offset(u32::MAX, u32::MAX),
        u64::from(u32::MAX - 1) * u64::from(u32::MAX)
    );
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_envelope_parse() {
    let body = envelope(3, json!([{"id": 1}, {"id": 2}]));
    let env = PageEnvelope::parse(body, "crm", "contacts").unwrap();

    assert_eq!(env.total_pages, 3);
    assert_eq!(env.records, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[test]
fn test_envelope_empty_records_is_valid() {
    let env = PageEnvelope::parse(envelope(1, json!([])), "crm", "contacts").unwrap();
    assert_eq!(env.total_pages, 1);
    assert!(env.records.is_empty());
}

#[test]
fn test_envelope_reads_first_entry_only() {
    let body = json!({
        "applicationData": { "crm": [
            { "data": { "paging": { "num_pages": 2 }, "contacts": [1] } },
            { "data": { "paging": { "num_pages": 9 }, "contacts": [2, 3] } }
        ]}
    });
    let env = PageEnvelope::parse(body, "crm", "contacts").unwrap();
    assert_eq!(env.total_pages, 2);
    assert_eq!(env.records, vec![json!(1)]);
}

#[test_case(json!([1, 2]) ; "body not an object")]
#[test_case(json!({"data": {}}) ; "missing root")]
#[test_case(json!({"applicationData": {"other": []}}) ; "missing application id")]
#[test_case(json!({"applicationData": {"crm": {}}}) ; "application entry not a list")]
#[test_case(json!({"applicationData": {"crm": []}}) ; "empty application list")]
#[test_case(json!({"applicationData": {"crm": [{}]}}) ; "missing data")]
#[test_case(json!({"applicationData": {"crm": [{"data": {"contacts": []}}]}}) ; "missing paging")]
#[test_case(json!({"applicationData": {"crm": [{"data": {"paging": {}, "contacts": []}}]}}) ; "missing num_pages")]
#[test_case(json!({"applicationData": {"crm": [{"data": {"paging": {"num_pages": "3"}, "contacts": []}}]}}) ; "num_pages not a number")]
#[test_case(json!({"applicationData": {"crm": [{"data": {"paging": {"num_pages": 0}, "contacts": []}}]}}) ; "zero pages")]
#[test_case(json!({"applicationData": {"crm": [{"data": {"paging": {"num_pages": 1}}}]}}) ; "missing records field")]
#[test_case(json!({"applicationData": {"crm": [{"data": {"paging": {"num_pages": 1}, "contacts": {}}}]}}) ; "records not a list")]
fn test_envelope_shape_errors(body: Value) {
    let err = PageEnvelope::parse(body, "crm", "contacts").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_envelope_error_names_missing_key() {
    let body = json!({"applicationData": {"crm": [{"data": {"paging": {"num_pages": 1}}}]}});
    let err = PageEnvelope::parse(body, "crm", "contacts").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected response envelope: missing key 'contacts' in 'applicationData.crm[0].data'"
    );
}

// ============================================================================
// Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_sends_paging_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/crm/records"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "200"))
        .and(header(HEADER_API_KEY, "key-123"))
        .and(header(HEADER_TRACE_ID, "trace-abc"))
        .and(header_exists(HEADER_DATE))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(4, json!([{"id": 201}]))))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config_for(&server, 100)).unwrap();
    let page = fetcher.fetch_page(3).await.unwrap();

    assert_eq!(page.index, 3);
    assert_eq!(page.offset, 200);
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.records, vec![json!({"id": 201})]);
}

#[tokio::test]
async fn test_fetch_first_page_uses_zero_offset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("limit", "25"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(1, json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config_for(&server, 25)).unwrap();
    let page = fetcher.fetch_page(1).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_fetch_page_date_header_is_unix_seconds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(1, json!([]))))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config_for(&server, 10)).unwrap();
    fetcher.fetch_page(1).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let date = requests[0]
        .headers
        .get(HEADER_DATE)
        .unwrap()
        .to_str()
        .unwrap()
        .parse::<i64>()
        .unwrap();
    assert!((chrono::Utc::now().timestamp() - date).abs() < 60);
}

#[tokio::test]
async fn test_fetch_page_zero_is_rejected_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(1, json!([]))))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config_for(&server, 10)).unwrap();
    let err = fetcher.fetch_page(0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn test_fetch_page_http_error_is_transport() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config_for(&server, 10)).unwrap();
    let err = fetcher.fetch_page(1).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_fetch_page_bad_envelope_is_protocol() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"applicationData": {}})))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config_for(&server, 10)).unwrap();
    let err = fetcher.fetch_page(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}
