//! Record shapes written by the dashboard backend and the static event file,
//! plus their validation into domain types.
//!
//! Decoding is all-or-nothing: the first invalid record rejects the whole
//! payload with a `Parse` error naming the record index.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ChangePoint, DateRange, Event, EventCategory, FetchError, PriceMetric, PricePoint, Resource,
};

/// `{Date, Price}` row of `/oil-prices` and `/oil-prices/filter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Trading day, ISO formatted.
    #[serde(rename = "Date")]
    pub date: String,
    /// Price in USD per barrel.
    #[serde(rename = "Price")]
    pub price: f64,
}

/// `{change_date, probability}` row of `/change-points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePointRecord {
    /// Estimated change date, ISO formatted.
    pub change_date: String,
    /// Posterior probability of the change.
    pub probability: f64,
}

/// `{Date, EventType, Description}` row of `/events` and of the event CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event day, ISO formatted.
    #[serde(rename = "Date")]
    pub date: String,
    /// Category label.
    #[serde(rename = "EventType")]
    pub event_type: String,
    /// Free-text description.
    #[serde(rename = "Description")]
    pub description: String,
}

/// `{Date, daily_return, volatility}` row of `/oil-metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Trading day, ISO formatted.
    #[serde(rename = "Date")]
    pub date: String,
    /// Day-over-day return.
    #[serde(default)]
    pub daily_return: Option<f64>,
    /// Rolling volatility.
    #[serde(default)]
    pub volatility: Option<f64>,
}

/// `{"error": "..."}` body returned by the backend on failures.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Parse an ISO calendar date, discarding a trailing time part.
///
/// Accepts `2020-01-02`, `2020-01-02T00:00:00`, and `2020-01-02 00:00:00`.
#[must_use]
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let day = match s.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &s[..idx],
        Some(_) => return None,
        None => s,
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Rewrite bare `NaN`, `Infinity`, and `-Infinity` tokens to `null`.
///
/// The backend serializes missing pandas values with these non-standard
/// tokens. Text inside JSON strings is left alone.
#[must_use]
pub fn null_non_finite(body: &str) -> Cow<'_, str> {
    const TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    if !TOKENS.iter().any(|t| body.contains(t)) {
        return Cow::Borrowed(body);
    }
    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = body;
    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(t) = TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[t.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

/// Decode a JSON array body into wire records.
///
/// Bare non-finite number tokens are read as `null`; see [`null_non_finite`].
///
/// # Errors
/// Returns `Parse` for `resource` if the body is not an array of `T`.
pub fn decode_json<T: DeserializeOwned>(resource: Resource, body: &str) -> Result<Vec<T>, FetchError> {
    serde_json::from_str(&null_non_finite(body)).map_err(|e| FetchError::parse(resource, e.to_string()))
}

/// Extract the backend's `{"error": ...}` message from a failure body, if present.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

fn date_of(resource: Resource, index: usize, raw: &str) -> Result<NaiveDate, FetchError> {
    parse_calendar_date(raw).ok_or_else(|| {
        FetchError::parse(resource, format!("record {index}: invalid date '{raw}'"))
    })
}

/// Validate price rows fetched for `range`.
///
/// Rows must carry finite prices, strictly ascending dates, and lie inside `range`.
///
/// # Errors
/// Returns `Parse` for `Resource::Prices` naming the first offending row.
pub fn decode_prices(
    records: Vec<PriceRecord>,
    range: &DateRange,
) -> Result<Vec<PricePoint>, FetchError> {
    let resource = Resource::Prices;
    let mut out: Vec<PricePoint> = Vec::with_capacity(records.len());
    for (i, r) in records.into_iter().enumerate() {
        let date = date_of(resource, i, &r.date)?;
        if !r.price.is_finite() {
            return Err(FetchError::parse(
                resource,
                format!("record {i}: price {} is not finite", r.price),
            ));
        }
        if let Some(prev) = out.last()
            && prev.date >= date
        {
            return Err(FetchError::parse(
                resource,
                format!("record {i}: date {date} does not follow {}", prev.date),
            ));
        }
        if !range.contains(date) {
            return Err(FetchError::parse(
                resource,
                format!("record {i}: date {date} outside requested range {range}"),
            ));
        }
        out.push(PricePoint::new(date, r.price));
    }
    Ok(out)
}

/// Validate change point rows; probabilities must lie in `[0, 1]`.
///
/// # Errors
/// Returns `Parse` for `Resource::ChangePoints` naming the first offending row.
pub fn decode_change_points(records: Vec<ChangePointRecord>) -> Result<Vec<ChangePoint>, FetchError> {
    let resource = Resource::ChangePoints;
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let date = date_of(resource, i, &r.change_date)?;
            if !(0.0..=1.0).contains(&r.probability) {
                return Err(FetchError::parse(
                    resource,
                    format!("record {i}: probability {} outside [0, 1]", r.probability),
                ));
            }
            Ok(ChangePoint::new(date, r.probability))
        })
        .collect()
}

/// Validate event rows.
///
/// # Errors
/// Returns `Parse` for `Resource::Events` naming the first row with a bad date.
pub fn decode_events(records: Vec<EventRecord>) -> Result<Vec<Event>, FetchError> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let date = date_of(Resource::Events, i, &r.date)?;
            Ok(Event::new(
                date,
                EventCategory::from_label(&r.event_type),
                r.description.trim(),
            ))
        })
        .collect()
}

/// Validate metric rows; present values must be finite.
///
/// # Errors
/// Returns `Parse` for `Resource::Metrics` naming the first offending row.
pub fn decode_metrics(records: Vec<MetricRecord>) -> Result<Vec<PriceMetric>, FetchError> {
    let resource = Resource::Metrics;
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let date = date_of(resource, i, &r.date)?;
            for (field, v) in [("daily_return", r.daily_return), ("volatility", r.volatility)] {
                if v.is_some_and(|x| !x.is_finite()) {
                    return Err(FetchError::parse(
                        resource,
                        format!("record {i}: {field} is not finite"),
                    ));
                }
            }
            Ok(PriceMetric {
                date,
                daily_return: r.daily_return,
                volatility: r.volatility,
            })
        })
        .collect()
}
