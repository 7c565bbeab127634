//! Brent-specific error, resource, and configuration primitives shared by every
//! crate in the workspace.
#![warn(missing_docs)]

mod config;
mod error;
mod resource;

pub use config::{DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT, DashboardConfig};
pub use error::{BrentError, ConfigError, FetchError, RangeError};
pub use resource::Resource;
