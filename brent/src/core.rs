use std::sync::Arc;
use std::time::Duration;

use brent_core::{
    BrentError, DashboardConfig, DataSource, DateRange, EventSource, MergedView, NaiveDate,
    RangeError,
};
use brent_http::HttpSource;
use tokio::sync::watch;

use crate::coordinator::{FetchCoordinator, LoadHandle, LoadState};
use crate::filter::RangeFilter;
use crate::source_set::SourceSet;

/// Data layer behind the dashboard: one coordinator plus one range filter.
#[derive(Debug)]
pub struct Dashboard {
    coordinator: FetchCoordinator,
    filter: RangeFilter,
    config: DashboardConfig,
    mounted: bool,
}

/// Builder for a [`Dashboard`].
pub struct DashboardBuilder {
    sources: Option<SourceSet>,
    events: Option<Arc<dyn EventSource>>,
    config: DashboardConfig,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardBuilder {
    /// Default configuration and no explicit source.
    ///
    /// Without [`with_source`](Self::with_source), `build` talks to the HTTP
    /// backend at the configured base URL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: None,
            events: None,
            config: DashboardConfig::default(),
        }
    }

    /// Serve all three resources from `source`.
    ///
    /// Registering a second source replaces the first.
    #[must_use]
    pub fn with_source<S: DataSource + 'static>(mut self, source: Arc<S>) -> Self {
        self.sources = Some(SourceSet::from_source(source));
        self
    }

    /// Serve events from `events` instead of the main source.
    #[must_use]
    pub fn event_source(mut self, events: Arc<dyn EventSource>) -> Self {
        self.events = Some(events);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Per-fetch timeout; `None` waits indefinitely.
    #[must_use]
    pub const fn fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Build the dashboard. Nothing is fetched until [`Dashboard::mount`].
    ///
    /// # Errors
    /// Returns `BrentError::Config` if no source was given and the configured
    /// base URL is invalid.
    pub fn build(self) -> Result<Dashboard, BrentError> {
        let mut sources = match self.sources {
            Some(s) => s,
            None => SourceSet::from_source(Arc::new(HttpSource::from_config(&self.config)?)),
        };
        if let Some(events) = self.events {
            sources = sources.with_events(events);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = sources.name(),
            events = sources.events_name(),
            fetch_timeout_ms = self.config.fetch_timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
            "dashboard built"
        );

        Ok(Dashboard {
            coordinator: FetchCoordinator::new(sources, self.config.fetch_timeout),
            filter: RangeFilter::new(),
            config: self.config,
            mounted: false,
        })
    }
}

impl Dashboard {
    /// Start building a dashboard.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use brent::Dashboard;
    /// use brent_mock::MockSource;
    ///
    /// let mut dash = Dashboard::builder()
    ///     .with_source(Arc::new(MockSource::new()))
    ///     .fetch_timeout(Some(std::time::Duration::from_secs(5)))
    ///     .build()?;
    /// let handle = dash.mount().expect("first mount");
    /// handle.wait().await;
    /// ```
    #[must_use]
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::new()
    }

    /// Run the initial load over the full history.
    ///
    /// Only starts a load if neither `mount` nor [`apply`](Self::apply) has
    /// started one yet; otherwise returns `None` and leaves the applied range
    /// in charge.
    pub fn mount(&mut self) -> Option<LoadHandle> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.coordinator.start_load(DateRange::unbounded()))
    }

    /// Set or clear the draft start.
    ///
    /// # Errors
    /// See [`RangeFilter::set_draft_start`].
    pub fn set_draft_start(&mut self, start: Option<NaiveDate>) -> Result<(), RangeError> {
        self.filter.set_draft_start(start)
    }

    /// Set or clear the draft end.
    ///
    /// # Errors
    /// See [`RangeFilter::set_draft_end`].
    pub fn set_draft_end(&mut self, end: Option<NaiveDate>) -> Result<(), RangeError> {
        self.filter.set_draft_end(end)
    }

    /// Commit the draft range and reload.
    ///
    /// # Errors
    /// Returns `BrentError::Range` while the last draft edit is rejected.
    pub fn apply(&mut self) -> Result<LoadHandle, BrentError> {
        let handle = self.filter.apply(&self.coordinator)?;
        self.mounted = true;
        Ok(handle)
    }

    /// Draft and applied ranges.
    #[must_use]
    pub const fn range_filter(&self) -> &RangeFilter {
        &self.filter
    }

    /// The coordinator, e.g. to start loads directly.
    #[must_use]
    pub const fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    /// Configuration the dashboard was built with.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Snapshot of the load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.coordinator.state()
    }

    /// Watch load state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.coordinator.subscribe()
    }

    /// Merged view of the loaded data, if the latest load succeeded.
    #[must_use]
    pub fn view(&self) -> Option<MergedView> {
        self.state().view()
    }
}
