use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Resource;

/// Failure of a single resource fetch.
///
/// Every variant is tagged with the failing [`Resource`] so a collapsed
/// coordinated load can still tell which sub-fetch broke it.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, body read).
    #[error("{resource}: transport error: {message}")]
    Transport {
        /// Resource being fetched.
        resource: Resource,
        /// Human-readable error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{resource}: HTTP {status}: {message}")]
    HttpStatus {
        /// Resource being fetched.
        resource: Resource,
        /// HTTP status code returned by the server.
        status: u16,
        /// Server-provided error text, or the canonical reason.
        message: String,
    },

    /// The payload could not be decoded or contained an invalid record.
    #[error("{resource}: malformed payload: {message}")]
    Parse {
        /// Resource being fetched.
        resource: Resource,
        /// Description of the first offending record or decode failure.
        message: String,
    },

    /// The fetch exceeded the configured per-fetch timeout.
    #[error("{resource}: timed out after {timeout_ms} ms")]
    Timeout {
        /// Resource being fetched.
        resource: Resource,
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
}

impl FetchError {
    /// Helper: build a `Transport` error.
    pub fn transport(resource: Resource, message: impl Into<String>) -> Self {
        Self::Transport {
            resource,
            message: message.into(),
        }
    }

    /// Helper: build an `HttpStatus` error.
    pub fn http_status(resource: Resource, status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            resource,
            status,
            message: message.into(),
        }
    }

    /// Helper: build a `Parse` error.
    pub fn parse(resource: Resource, message: impl Into<String>) -> Self {
        Self::Parse {
            resource,
            message: message.into(),
        }
    }

    /// Helper: build a `Timeout` error.
    #[must_use]
    pub fn timeout(resource: Resource, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            resource,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// The resource whose fetch failed.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        match self {
            Self::Transport { resource, .. }
            | Self::HttpStatus { resource, .. }
            | Self::Parse { resource, .. }
            | Self::Timeout { resource, .. } => *resource,
        }
    }

    /// HTTP status, when the failure came from a server response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable machine-readable code: `http.<status>`, `transport`, `parse`, or `timeout`.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Transport { .. } => "transport".to_string(),
            Self::HttpStatus { status, .. } => format!("http.{status}"),
            Self::Parse { .. } => "parse".to_string(),
            Self::Timeout { .. } => "timeout".to_string(),
        }
    }

    /// Human-readable message without the resource prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Transport { message, .. }
            | Self::HttpStatus { message, .. }
            | Self::Parse { message, .. } => message.clone(),
            Self::Timeout { timeout_ms, .. } => format!("no response within {timeout_ms} ms"),
        }
    }
}

/// Rejected edit of a draft date range.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RangeError {
    /// The edit would place the start bound after the end bound.
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd {
        /// Proposed start bound.
        start: NaiveDate,
        /// Proposed end bound.
        end: NaiveDate,
    },
}

/// Invalid configuration value.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The base URL could not be parsed or is not http(s).
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl {
        /// Offending URL text.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidEnv {
        /// Environment variable name.
        var: String,
        /// Raw value found.
        value: String,
    },
}

/// Unified error type for dashboard-level operations.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BrentError {
    /// A resource fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A date range edit was rejected.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl BrentError {
    /// Returns true if re-applying the range or reloading may succeed.
    ///
    /// Validation and configuration errors need a different input first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
