use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ChangePoint, Event, EventCategory, PricePoint};

/// Which dataset a marker came from.
///
/// The derived ordering is the tie-break used by [`merge`]: change points sort
/// before events on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// A detected change point.
    ChangePoint,
    /// A historical event.
    Event,
}

/// Kind-specific data carried by a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MarkerPayload {
    /// Change point probability.
    ChangePoint {
        /// Posterior probability, in `[0, 1]`.
        probability: f64,
    },
    /// Event label and text.
    Event {
        /// Event category.
        category: EventCategory,
        /// Free-text description.
        description: String,
    },
}

/// A point-in-time annotation attached to the price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Annotated day.
    pub date: NaiveDate,
    /// Kind-specific data.
    pub payload: MarkerPayload,
}

impl Marker {
    /// Kind of this marker, derived from its payload.
    #[must_use]
    pub const fn kind(&self) -> MarkerKind {
        match self.payload {
            MarkerPayload::ChangePoint { .. } => MarkerKind::ChangePoint,
            MarkerPayload::Event { .. } => MarkerKind::Event,
        }
    }
}

impl From<&ChangePoint> for Marker {
    fn from(cp: &ChangePoint) -> Self {
        Self {
            date: cp.date,
            payload: MarkerPayload::ChangePoint {
                probability: cp.probability,
            },
        }
    }
}

impl From<&Event> for Marker {
    fn from(ev: &Event) -> Self {
        Self {
            date: ev.date,
            payload: MarkerPayload::Event {
                category: ev.category.clone(),
                description: ev.description.clone(),
            },
        }
    }
}

/// Render-ready view: the price series plus every marker, on one time axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergedView {
    /// Price series, date ascending.
    pub series: Vec<PricePoint>,
    /// Change point and event markers, date ascending.
    pub markers: Vec<Marker>,
}

impl MergedView {
    /// First and last date of the series, if it is non-empty.
    #[must_use]
    pub fn series_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.series.first()?.date, self.series.last()?.date))
    }

    /// True if `marker` falls within the series span.
    ///
    /// Markers outside it are still part of the view; presentation decides
    /// whether to draw them off-scale.
    #[must_use]
    pub fn is_within_series(&self, marker: &Marker) -> bool {
        self.series_span()
            .is_some_and(|(lo, hi)| lo <= marker.date && marker.date <= hi)
    }

    /// Markers of a single kind, in view order.
    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.kind() == kind)
    }
}

/// Align the three datasets into one view.
///
/// - `series` is `prices` unchanged.
/// - `markers` is every change point and event, sorted by date ascending.
///   Same-date ties place change points before events; within a kind the
///   input order is kept (the sort is stable).
/// - Markers outside the series span are kept, not clipped.
/// - Empty inputs simply contribute no markers.
#[must_use]
pub fn merge(prices: &[PricePoint], change_points: &[ChangePoint], events: &[Event]) -> MergedView {
    let mut markers: Vec<Marker> = Vec::with_capacity(change_points.len() + events.len());
    markers.extend(change_points.iter().map(Marker::from));
    markers.extend(events.iter().map(Marker::from));
    markers.sort_by_key(|m| (m.date, m.kind()));

    MergedView {
        series: prices.to_vec(),
        markers,
    }
}
