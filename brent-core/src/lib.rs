//! brent-core
//!
//! Core types, traits, and utilities shared across the brent dashboard workspace.
//!
//! - `domain`: price points, change points, events, and date ranges.
//! - `connector`: the role traits a data source implements.
//! - `wire`: backend record shapes and their validation into domain types.
//! - `csv_events`: the static event file reader, usable as an event source.
//! - `timeseries`: alignment of prices, change points, and events into one view.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Source traits are `async_trait` based and the CSV event source reads its
//! file through `tokio::fs`, so callers must run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Source role traits and the `DataSource` umbrella.
pub mod connector;
/// Static event file reader.
pub mod csv_events;
/// Domain records shared by sources, the coordinator, and the merger.
pub mod domain;
/// Time-series alignment of the three datasets.
pub mod timeseries;
pub mod types;
/// Backend wire records and validation.
pub mod wire;

pub use connector::{ChangePointSource, DataSource, EventSource, PriceSource};
pub use csv_events::{CsvEventSource, read_events_csv};
pub use domain::{ChangePoint, DateRange, Event, EventCategory, PriceMetric, PricePoint};
pub use timeseries::align::{Marker, MarkerKind, MarkerPayload, MergedView, merge};
pub use types::*;
