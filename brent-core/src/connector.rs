use async_trait::async_trait;

use crate::{ChangePoint, DateRange, Event, FetchError, PricePoint};

/// Focused role trait for sources that serve the price series.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the price series restricted to `range`.
    ///
    /// An unbounded range requests the full history. Implementations issue
    /// exactly one request per call and never retry.
    async fn fetch_prices(&self, range: &DateRange) -> Result<Vec<PricePoint>, FetchError>;
}

/// Focused role trait for sources that serve detected change points.
#[async_trait]
pub trait ChangePointSource: Send + Sync {
    /// Fetch every known change point.
    async fn fetch_change_points(&self) -> Result<Vec<ChangePoint>, FetchError>;
}

/// Focused role trait for sources that serve historical events.
///
/// The network source and the static CSV file both implement it, so either
/// can back the event column of a dashboard.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch every known event.
    async fn fetch_events(&self) -> Result<Vec<Event>, FetchError>;

    /// Short label for logs when this source backs only the event role.
    fn origin(&self) -> &'static str {
        "custom"
    }
}

/// A source that serves all three resources of a coordinated load.
pub trait DataSource: PriceSource + ChangePointSource + EventSource {
    /// Stable identifier for logs.
    fn name(&self) -> &'static str;
}
