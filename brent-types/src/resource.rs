use core::fmt;
use serde::{Deserialize, Serialize};

/// Resource kinds served by the dashboard backend.
///
/// These map one-to-one with the HTTP endpoints and allow consistent
/// Display formatting in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Resource {
    /// Daily Brent price series (optionally range-filtered).
    Prices,
    /// Detected change points in the price process.
    ChangePoints,
    /// Labeled historical events.
    Events,
    /// Derived daily return / volatility metrics.
    Metrics,
}

impl Resource {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::ChangePoints => "change-points",
            Self::Events => "events",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
