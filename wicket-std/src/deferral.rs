//! Deferral queue drain.

use wicket_core::{DeferQueue, Response};

/// Run every pending deferral against `res`, most recently registered first.
///
/// Each deferral is awaited before the next one starts. A deferral that fails
/// is logged and skipped; the rest still run.
pub async fn drain(queue: &mut DeferQueue, res: &mut Response) {
    let total = queue.len();
    let mut failed = 0usize;

    while let Some(deferral) = queue.pop() {
        if let Err(error) = deferral.run(res).await {
            failed += 1;
            tracing::warn!(error = %error, remaining = queue.len(), "deferral failed");
        }
    }

    if total > 0 {
        tracing::trace!(total, failed, "deferrals drained");
    }
}
