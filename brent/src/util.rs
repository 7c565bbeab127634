use std::time::Duration;

use brent_core::{FetchError, Resource};

/// Bound a single sub-fetch with an optional timeout.
///
/// `None` awaits the fetch as-is. On expiry the fetch future is dropped and a
/// `FetchError::Timeout` for `resource` is returned.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "brent::util::fetch_with_timeout",
        level = "debug",
        skip_all,
        fields(
            resource = %resource,
            timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        ),
    )
)]
pub async fn fetch_with_timeout<T, Fut>(
    resource: Resource,
    timeout: Option<Duration>,
    fut: Fut,
) -> Result<T, FetchError>
where
    Fut: core::future::Future<Output = Result<T, FetchError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .unwrap_or_else(|_| Err(FetchError::timeout(resource, limit))),
        None => fut.await,
    }
}
