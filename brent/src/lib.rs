//! Brent drives the data layer of an oil price dashboard.
//!
//! Overview
//! - Loads three datasets together: the price series for a date range, the
//!   detected change points, and the historical events.
//! - Publishes one `LoadState` at a time through a `tokio::sync::watch`
//!   channel; a load is either fully `Loaded` or `Failed`, never partial.
//! - Keeps the user's draft date range apart from the applied one and rejects
//!   drafts whose start falls after their end.
//! - Aligns the three datasets into a `MergedView` for presentation.
//!
//! Key behaviors and trade-offs
//! - Supersession: starting a load makes every earlier load stale. Stale loads
//!   stop polling their sub-fetches and can never publish, whatever order their
//!   responses arrive in.
//! - Partial failure: the first failing sub-fetch fails the whole load and the
//!   other two are dropped. Earlier data is cleared rather than shown stale.
//! - Timeouts: each sub-fetch is bounded by `DashboardConfig::fetch_timeout`
//!   (30 s by default, `None` to disable). There are no retries; callers
//!   recover by applying again.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use brent::{Dashboard, LoadOutcome};
//! use brent_mock::MockSource;
//!
//! let mut dash = Dashboard::builder()
//!     .with_source(Arc::new(MockSource::new()))
//!     .build()?;
//! dash.mount().expect("first mount").wait().await;
//!
//! dash.set_draft_start(Some(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()))?;
//! if let LoadOutcome::Applied(state) = dash.apply()?.wait().await {
//!     let view = state.view();
//! }
//! ```
//!
//! See `brent/examples/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod coordinator;
mod filter;
mod source_set;
mod util;

pub use coordinator::{Dataset, FetchCoordinator, LoadHandle, LoadOutcome, LoadState};
pub use crate::core::{Dashboard, DashboardBuilder};
pub use filter::RangeFilter;
pub use source_set::SourceSet;
pub use util::fetch_with_timeout;

pub use brent_http::{HttpSource, HttpSourceBuilder};

// Re-export core types for convenience
pub use brent_core::{
    BrentError, ChangePoint, ChangePointSource, ConfigError, CsvEventSource, DashboardConfig,
    DataSource, DateRange, Event, EventCategory, EventSource, FetchError, Marker, MarkerKind,
    MarkerPayload, MergedView, NaiveDate, PriceMetric, PricePoint, PriceSource, RangeError,
    Resource, merge, read_events_csv,
};
