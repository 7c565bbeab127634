//! brent-http
//!
//! Data source backed by the dashboard's HTTP backend. Each fetch issues one
//! GET request, validates the JSON rows, and maps every failure to a
//! `FetchError` tagged with the resource that failed. No retries.
#![warn(missing_docs)]

use async_trait::async_trait;
use brent_core::wire::{
    self, ChangePointRecord, EventRecord, MetricRecord, PriceRecord, decode_change_points,
    decode_events, decode_json, decode_metrics, decode_prices,
};
use brent_core::{
    BrentError, ChangePoint, ChangePointSource, DashboardConfig, DataSource, DateRange, Event,
    EventSource, FetchError, PriceMetric, PricePoint, PriceSource, Resource,
};
use serde::de::DeserializeOwned;
use url::Url;

const PRICES_PATH: &str = "oil-prices";
const PRICES_FILTER_PATH: &str = "oil-prices/filter";
const CHANGE_POINTS_PATH: &str = "change-points";
const EVENTS_PATH: &str = "events";
const METRICS_PATH: &str = "oil-metrics";

/// Data source talking to the dashboard backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

/// Fluent builder for [`HttpSource`].
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    config: DashboardConfig,
    client: Option<reqwest::Client>,
}

impl HttpSourceBuilder {
    /// Backend base path, e.g. `http://127.0.0.1:5000/api`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// `User-Agent` header; ignored when a custom client is supplied.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Take base URL and user agent from a dashboard configuration.
    #[must_use]
    pub fn config(mut self, config: &DashboardConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, pools).
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Validate the base URL and build the source.
    ///
    /// # Errors
    /// Returns `BrentError::Config` for an invalid base URL and
    /// `BrentError::InvalidArg` if the HTTP client cannot be created.
    pub fn build(self) -> Result<HttpSource, BrentError> {
        let base = self.config.parsed_base_url()?;
        let client = match self.client {
            Some(c) => c,
            None => reqwest::Client::builder()
                .user_agent(self.config.user_agent.clone())
                .build()
                .map_err(|e| BrentError::InvalidArg(format!("http client: {e}")))?,
        };
        Ok(HttpSource { client, base })
    }
}

impl HttpSource {
    /// Start building a source; defaults to the local backend.
    #[must_use]
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// Build a source from a dashboard configuration.
    ///
    /// # Errors
    /// See [`HttpSourceBuilder::build`].
    pub fn from_config(config: &DashboardConfig) -> Result<Self, BrentError> {
        Self::builder().config(config).build()
    }

    /// Resolved base URL, always ending in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, resource: Resource, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|e| FetchError::transport(resource, format!("bad endpoint '{path}': {e}")))
    }

    /// URL used by `fetch_prices` for `range`.
    ///
    /// The unbounded range hits `/oil-prices`; otherwise `/oil-prices/filter`
    /// receives whichever of `start`/`end` is present as `YYYY-MM-DD`.
    ///
    /// # Errors
    /// Returns `Transport` if the endpoint cannot be joined onto the base URL.
    pub fn prices_url(&self, range: &DateRange) -> Result<Url, FetchError> {
        if range.is_unbounded() {
            return self.endpoint(Resource::Prices, PRICES_PATH);
        }
        let mut url = self.endpoint(Resource::Prices, PRICES_FILTER_PATH)?;
        {
            let mut q = url.query_pairs_mut();
            if let Some(s) = range.start() {
                q.append_pair("start", &s.format("%Y-%m-%d").to_string());
            }
            if let Some(e) = range.end() {
                q.append_pair("end", &e.format("%Y-%m-%d").to_string());
            }
        }
        Ok(url)
    }

    /// Issue one GET and decode the JSON array body.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        resource: Resource,
        url: Url,
    ) -> Result<Vec<T>, FetchError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(%resource, url = %url, "GET");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(resource, e.to_string()))?;
        let status = resp.status();

        if !status.is_success() {
            // an unreadable error body still reports the status
            let body = resp.text().await.ok();
            let message = body.as_deref().and_then(wire::error_message).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            #[cfg(feature = "tracing")]
            tracing::warn!(%resource, status = status.as_u16(), %message, "backend returned error status");
            return Err(FetchError::http_status(resource, status.as_u16(), message));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::transport(resource, e.to_string()))?;
        decode_json(resource, &body)
    }

    /// Fetch derived daily metrics from `/oil-metrics`.
    ///
    /// # Errors
    /// Same rules as the coordinated fetches, tagged `Resource::Metrics`.
    pub async fn fetch_metrics(&self) -> Result<Vec<PriceMetric>, FetchError> {
        let url = self.endpoint(Resource::Metrics, METRICS_PATH)?;
        let rows: Vec<MetricRecord> = self.get_rows(Resource::Metrics, url).await?;
        decode_metrics(rows)
    }
}

#[async_trait]
impl PriceSource for HttpSource {
    async fn fetch_prices(&self, range: &DateRange) -> Result<Vec<PricePoint>, FetchError> {
        let url = self.prices_url(range)?;
        let rows: Vec<PriceRecord> = self.get_rows(Resource::Prices, url).await?;
        decode_prices(rows, range)
    }
}

#[async_trait]
impl ChangePointSource for HttpSource {
    async fn fetch_change_points(&self) -> Result<Vec<ChangePoint>, FetchError> {
        let url = self.endpoint(Resource::ChangePoints, CHANGE_POINTS_PATH)?;
        let rows: Vec<ChangePointRecord> = self.get_rows(Resource::ChangePoints, url).await?;
        decode_change_points(rows)
    }
}

#[async_trait]
impl EventSource for HttpSource {
    async fn fetch_events(&self) -> Result<Vec<Event>, FetchError> {
        let url = self.endpoint(Resource::Events, EVENTS_PATH)?;
        let rows: Vec<EventRecord> = self.get_rows(Resource::Events, url).await?;
        decode_events(rows)
    }
}

impl DataSource for HttpSource {
    fn name(&self) -> &'static str {
        "brent-http"
    }
}
