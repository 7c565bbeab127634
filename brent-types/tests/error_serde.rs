use std::time::Duration;

use brent_types::{BrentError, DashboardConfig, FetchError, RangeError, Resource};
use chrono::NaiveDate;

#[test]
fn fetch_error_roundtrip_keeps_resource_and_status() {
    let err = FetchError::http_status(Resource::ChangePoints, 500, "boom");
    let json = serde_json::to_string(&err).expect("serialize fetch error");
    let de: FetchError = serde_json::from_str(&json).expect("deserialize fetch error");

    assert_eq!(de, err);
    assert_eq!(de.resource(), Resource::ChangePoints);
    assert_eq!(de.status(), Some(500));
    assert_eq!(de.code(), "http.500");
    assert_eq!(de.message(), "boom");
}

#[test]
fn fetch_error_display_is_prefixed_by_resource() {
    let err = FetchError::parse(Resource::Prices, "record 3: price is NaN");
    assert_eq!(
        err.to_string(),
        "prices: malformed payload: record 3: price is NaN"
    );
}

#[test]
fn timeout_reports_milliseconds() {
    let err = FetchError::timeout(Resource::Events, Duration::from_millis(2500));
    assert_eq!(err.code(), "timeout");
    assert_eq!(err.message(), "no response within 2500 ms");
    assert_eq!(err.to_string(), "events: timed out after 2500 ms");
}

#[test]
fn transport_code_has_no_status() {
    let err = FetchError::transport(Resource::Prices, "connection refused");
    assert_eq!(err.code(), "transport");
    assert_eq!(err.status(), None);
}

#[test]
fn range_error_message_names_both_bounds() {
    let err = RangeError::StartAfterEnd {
        start: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
    };
    assert_eq!(
        err.to_string(),
        "start date 2021-06-01 is after end date 2021-01-01"
    );
}

#[test]
fn brent_error_wraps_transparently() {
    let fetch: BrentError = FetchError::transport(Resource::Events, "reset").into();
    assert!(fetch.is_retryable());
    assert_eq!(fetch.to_string(), "events: transport error: reset");

    let range: BrentError = RangeError::StartAfterEnd {
        start: NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    }
    .into();
    assert!(!range.is_retryable());
}

#[test]
fn config_roundtrip() {
    let cfg = DashboardConfig {
        base_url: "https://brent.example/api".into(),
        fetch_timeout: Some(Duration::from_secs(7)),
        user_agent: "test-agent".into(),
    };
    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: DashboardConfig = serde_json::from_str(&json).expect("deserialize config");
    assert_eq!(de, cfg);
}
