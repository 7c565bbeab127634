//! Re-export of foundational types from `brent-types`.
// Consolidated re-exports so downstream crates can depend on `brent-core` only

pub use brent_types::{BrentError, ConfigError, FetchError, RangeError, Resource};
pub use brent_types::{DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT, DashboardConfig};

pub use chrono::NaiveDate;
