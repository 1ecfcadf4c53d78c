//! Time-limited handler execution.
//!
//! Requires the tokio runtime (feature `timeout`).

use std::time::Duration;
use thiserror::Error;
use wicket_core::{BoxError, Context, Handler, Outcome, Request};

/// Error returned when a wrapped handler overruns its budget.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("handler timed out after {duration:?}")]
pub struct TimeoutError {
    duration: Duration,
}

impl TimeoutError {
    /// Create a new timeout error.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// The duration that was exceeded.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// A handler wrapper that fails with [`TimeoutError`] when the inner handler
/// does not finish in time.
///
/// The dispatcher treats the error like any other handler fault, so the
/// request is answered with a 500 through the error handler.
///
/// ```rust,ignore
/// use std::time::Duration;
/// use wicket::Timeout;
///
/// router.get("/report", Timeout::new(build_report, Duration::from_secs(5)))?;
/// ```
pub struct Timeout<H> {
    inner: H,
    duration: Duration,
}

impl<H> Timeout<H> {
    /// Wrap `inner` with a time limit.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// Time limit in seconds.
    pub fn secs(inner: H, seconds: u64) -> Self {
        Self::new(inner, Duration::from_secs(seconds))
    }

    /// Time limit in milliseconds.
    pub fn millis(inner: H, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// The configured limit.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Handler> Handler for Timeout<H> {
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        match tokio::time::timeout(self.duration, self.inner.handle(req, ctx)).await {
            Ok(res) => res,
            Err(_) => {
                tracing::warn!(timeout = ?self.duration, path = %req.uri().path(), "handler timed out");
                Err(Box::new(TimeoutError::new(self.duration)))
            }
        }
    }
}
