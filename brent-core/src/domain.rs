use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::RangeError;

/// One daily observation of the Brent price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day.
    pub date: NaiveDate,
    /// Price in USD per barrel.
    pub price: f64,
}

impl PricePoint {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A date where the price process is believed to shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    /// Estimated change date.
    pub date: NaiveDate,
    /// Posterior probability of the change, in `[0, 1]`.
    pub probability: f64,
}

impl ChangePoint {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(date: NaiveDate, probability: f64) -> Self {
        Self { date, probability }
    }
}

/// Category of a historical event.
///
/// Drives display color only. Labels other than the three known ones are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    /// Wars, sanctions, political crises.
    Geopolitical,
    /// Recessions, financial crises, demand shocks.
    Economic,
    /// OPEC production decisions.
    Opec,
    /// Any other label, kept as found.
    Other(String),
}

impl EventCategory {
    /// Parse a backend label; matching is case-insensitive and whitespace-trimmed.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "geopolitical" => Self::Geopolitical,
            "economic" => Self::Economic,
            "opec" => Self::Opec,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Canonical label as written by the backend.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Geopolitical => "Geopolitical",
            Self::Economic => "Economic",
            Self::Opec => "OPEC",
            Self::Other(raw) => raw,
        }
    }

    /// Color used by the event table and chart markers.
    #[must_use]
    pub const fn display_color(&self) -> &'static str {
        match self {
            Self::Geopolitical => "red",
            Self::Economic => "blue",
            Self::Opec => "green",
            Self::Other(_) => "black",
        }
    }
}

impl From<String> for EventCategory {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<EventCategory> for String {
    fn from(value: EventCategory) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled historical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Day the event happened.
    pub date: NaiveDate,
    /// Event category.
    pub category: EventCategory,
    /// Free-text description.
    pub description: String,
}

impl Event {
    /// Convenience constructor.
    pub fn new(date: NaiveDate, category: EventCategory, description: impl Into<String>) -> Self {
        Self {
            date,
            category,
            description: description.into(),
        }
    }
}

/// Derived daily metrics served next to the price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMetric {
    /// Trading day.
    pub date: NaiveDate,
    /// Day-over-day log return; absent on the first day.
    pub daily_return: Option<f64>,
    /// Rolling volatility; absent until the window fills.
    pub volatility: Option<f64>,
}

/// Inclusive calendar date range with optional bounds.
///
/// An absent bound is unbounded on that side. When both bounds are present,
/// `start <= end` always holds; every constructor enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    ///
    /// # Errors
    /// Returns `RangeError::StartAfterEnd` when both bounds are present and out of order.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, RangeError> {
        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Err(RangeError::StartAfterEnd { start: s, end: e });
        }
        Ok(Self { start, end })
    }

    /// The full history: no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Lower bound, if any.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Upper bound, if any.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Replace the lower bound, keeping the upper one.
    ///
    /// # Errors
    /// Returns `RangeError::StartAfterEnd` if the new start is after the current end.
    pub fn with_start(self, start: Option<NaiveDate>) -> Result<Self, RangeError> {
        Self::new(start, self.end)
    }

    /// Replace the upper bound, keeping the lower one.
    ///
    /// # Errors
    /// Returns `RangeError::StartAfterEnd` if the current start is after the new end.
    pub fn with_end(self, end: Option<NaiveDate>) -> Result<Self, RangeError> {
        Self::new(self.start, end)
    }

    /// True when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Inclusive membership test.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (None, None) => f.write_str("all"),
            (Some(s), None) => write!(f, "{s}.."),
            (None, Some(e)) => write!(f, "..={e}"),
            (Some(s), Some(e)) => write!(f, "{s}..={e}"),
        }
    }
}
