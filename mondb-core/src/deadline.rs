//! Deadline scoping for backend calls.

use std::{future::Future, time::Duration};

use crate::error::DeadlineExceeded;

/// Runs a backend future, failing with the backend's own error type if it does
/// not complete within `limit`.
///
/// The future is dropped when the deadline passes, which cancels any work the
/// backend driver has not yet completed.
pub async fn within<T, E, F>(limit: Duration, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<DeadlineExceeded>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?limit, "backend call exceeded its deadline");
            Err(E::from(DeadlineExceeded(limit)))
        }
    }
}
