//! Configuration shared by the HTTP source and the dashboard orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ConfigError;

/// Base URL of a locally running dashboard backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Default per-fetch timeout applied by the coordinator.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_BASE_URL: &str = "BRENT_API_BASE";
const ENV_FETCH_TIMEOUT_MS: &str = "BRENT_FETCH_TIMEOUT_MS";

/// Global configuration for the dashboard data layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Resource base path; endpoint paths such as `/oil-prices` are appended to it.
    pub base_url: String,
    /// Timeout for each individual sub-fetch of a coordinated load.
    ///
    /// `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
    /// `User-Agent` header sent by the HTTP source.
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            user_agent: concat!("brent/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `BRENT_API_BASE` and `BRENT_FETCH_TIMEOUT_MS`.
    ///
    /// A timeout of `0` disables the per-fetch timeout.
    ///
    /// # Errors
    /// Returns `ConfigError` if an override cannot be parsed or the resulting
    /// base URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied variable lookup.
    ///
    /// # Errors
    /// Returns `ConfigError` if an override cannot be parsed or the resulting
    /// base URL is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(base) = lookup(ENV_BASE_URL) {
            cfg.base_url = base;
        }
        if let Some(raw) = lookup(ENV_FETCH_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_FETCH_TIMEOUT_MS.to_string(),
                value: raw.clone(),
            })?;
            cfg.fetch_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        cfg.parsed_base_url()?;
        Ok(cfg)
    }

    /// Parse and validate `base_url`.
    ///
    /// The returned URL always ends with `/` so endpoint paths can be joined
    /// without dropping the last base segment.
    ///
    /// # Errors
    /// Returns `InvalidBaseUrl` if the URL does not parse or is not http(s).
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.fetch_timeout, Some(DEFAULT_FETCH_TIMEOUT));
        assert!(cfg.user_agent.starts_with("brent/"));
    }

    #[test]
    fn parsed_base_url_appends_trailing_slash() {
        let cfg = DashboardConfig::default();
        let url = cfg.parsed_base_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/");
        assert_eq!(
            url.join("oil-prices").unwrap().as_str(),
            "http://127.0.0.1:5000/api/oil-prices"
        );
    }

    #[test]
    fn parsed_base_url_rejects_non_http() {
        let cfg = DashboardConfig {
            base_url: "ftp://example.test/api".into(),
            ..DashboardConfig::default()
        };
        assert!(matches!(
            cfg.parsed_base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn lookup_overrides_base_and_timeout() {
        let cfg = DashboardConfig::from_lookup(|k| match k {
            "BRENT_API_BASE" => Some("https://brent.example/api/v2".into()),
            "BRENT_FETCH_TIMEOUT_MS" => Some("1500".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.base_url, "https://brent.example/api/v2");
        assert_eq!(cfg.fetch_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn zero_timeout_disables() {
        let cfg = DashboardConfig::from_lookup(|k| {
            (k == "BRENT_FETCH_TIMEOUT_MS").then(|| "0".to_string())
        })
        .unwrap();
        assert_eq!(cfg.fetch_timeout, None);
    }

    #[test]
    fn garbage_timeout_is_rejected() {
        let err = DashboardConfig::from_lookup(|k| {
            (k == "BRENT_FETCH_TIMEOUT_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: "BRENT_FETCH_TIMEOUT_MS".into(),
                value: "soon".into()
            }
        );
    }
}
