//! Timeout helpers for non-streaming calls
//!
//! Streams are bounded by the HTTP client's idle-read timeout and by
//! cancellation; single-shot completions and data store calls get an overall
//! deadline here.

use std::future::Future;
use std::time::Duration;

use crate::types::{MasteryError, Result};

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(MasteryError::timeout(operation_name, timeout)),
    }
}
