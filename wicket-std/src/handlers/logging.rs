//! Request logging.

use wicket_core::{BoxError, Context, Handler, Outcome, Request};

/// A handler that logs the request line and continues.
///
/// Intended for the `prepare` slot or the front of a composed chain.
///
/// # Example
///
/// ```rust,ignore
/// use wicket::{Logging, Router};
///
/// let mut builder = Router::builder();
/// builder.prepare(Logging::named("edge"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logging {
    name: &'static str,
}

impl Logging {
    /// Create a new `Logging` handler with a default name.
    pub fn new() -> Self {
        Self { name: "request" }
    }

    /// Create a new `Logging` handler with a custom name.
    ///
    /// The name is used in log messages to identify the stage.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The configured name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Logging {
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        tracing::debug!(
            name = %self.name,
            method = %req.method(),
            path = %ctx.path(),
            query = ctx.url().query().unwrap_or(""),
            "incoming request"
        );
        Ok(Outcome::Continue)
    }
}
