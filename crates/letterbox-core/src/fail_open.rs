//! Fail-open execution for collaborators that must never mask a scenario result
//!
//! Screenshot capture and report flushing run while a scenario is already
//! being recorded. If they fail, the failure is logged and the run continues.
//!
//! Do NOT use fail-open for page operations or assertions.

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Execute an operation that should fail open
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// ```no_run
/// use letterbox_core::fail_open::fail_open;
/// use letterbox_core::Result;
///
/// async fn flush_report() -> Result<()> {
///     Ok(())
/// }
///
/// async fn example() {
///     let flushed = fail_open("report_flush", flush_report()).await;
///     assert!(flushed.is_some());
/// }
/// ```
pub async fn fail_open<Fut, T>(operation_name: &str, operation: Fut) -> Option<T>
where
    Fut: Future<Output = Result<T>>,
{
    match operation.await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}
