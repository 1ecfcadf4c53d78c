use tracing::Instrument;
use wicket_core::{BoxError, Context, Handler, Outcome, Request};

/// Header carrying a propagated trace id, if the caller sent one.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// A handler wrapper that instruments execution with a `tracing` span.
///
/// The span is named `handle` and carries the route name, method and path.
/// If the request carries an `x-trace-id` header, its value is recorded on
/// the span too.
pub struct Traced<H> {
    inner: H,
    name: &'static str,
}

impl<H> Traced<H> {
    /// Wrap `inner`, labelling its span with `name`.
    pub const fn new(inner: H, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The span label.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Clone> Clone for Traced<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<H: Copy> Copy for Traced<H> {}

impl<H: Handler> Handler for Traced<H> {
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        let trace_id = req
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok());

        let span = match trace_id {
            Some(trace_id) => tracing::info_span!(
                "handle",
                route = %self.name,
                method = %req.method(),
                path = %ctx.path(),
                trace_id = %trace_id,
            ),
            None => tracing::info_span!(
                "handle",
                route = %self.name,
                method = %req.method(),
                path = %ctx.path(),
            ),
        };

        async move { self.inner.handle(req, ctx).await }
            .instrument(span)
            .await
    }
}
