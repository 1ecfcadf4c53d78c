//! Error response rendering.
//!
//! The dispatcher calls the error handler in two situations:
//!
//! - no route matched: [`Context::status`] is `404`;
//! - the prepare hook or the matched handler faulted: [`Context::status`] is
//!   `500` and [`Context::error`] holds the fault.
//!
//! An error handler that itself fails is not recovered; the failure is
//! returned from `Router::run` as [`WicketError::ErrorHandler`].
//!
//! [`WicketError::ErrorHandler`]: crate::WicketError::ErrorHandler

use bytes::Bytes;
use futures::future::BoxFuture;
use http::StatusCode;
use std::future::Future;
use wicket_core::{BoxError, Context, Request, Response};
use wicket_std::status::StatusText;

/// Renders the response for a missing route or a handler fault.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ErrorHandler`",
    label = "missing `ErrorHandler` implementation",
    note = "Error handlers must implement `on_error`, or be built with `error_fn`."
)]
pub trait ErrorHandler: Send + Sync + 'static {
    /// Produce the error response. The status and fault are on `ctx`.
    fn on_error(
        &self,
        req: &Request,
        ctx: &mut Context,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send;
}

/// Dynamic object-safe version of [`ErrorHandler`].
pub trait DynErrorHandler: Send + Sync + 'static {
    /// Produce the error response (dynamic dispatch version).
    fn on_error_dyn<'a>(
        &'a self,
        req: &'a Request,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, Result<Response, BoxError>>;
}

impl<T: ErrorHandler> DynErrorHandler for T {
    fn on_error_dyn<'a>(
        &'a self,
        req: &'a Request,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        Box::pin(self.on_error(req, ctx))
    }
}

/// The built-in error handler.
///
/// The body is the fault's message when there is one, otherwise the canned
/// status text. No headers are added.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorHandler {
    status_text: StatusText,
}

impl DefaultErrorHandler {
    /// Render canned text from `status_text`.
    pub fn new(status_text: StatusText) -> Self {
        Self { status_text }
    }

    /// Build the response synchronously.
    pub fn render(&self, ctx: &Context) -> Response {
        let status = ctx.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match ctx.error() {
            Some(err) => err.to_string(),
            None => self.status_text.get(status).to_string(),
        };

        let mut res = Response::new(Some(Bytes::from(body)));
        *res.status_mut() = status;
        res
    }
}

impl ErrorHandler for DefaultErrorHandler {
    async fn on_error(&self, _req: &Request, ctx: &mut Context) -> Result<Response, BoxError> {
        Ok(self.render(ctx))
    }
}

/// An [`ErrorHandler`] built from a closure. See [`error_fn`].
#[derive(Clone, Copy)]
pub struct ErrorFn<F> {
    f: F,
}

/// Wrap a closure returning a boxed future as an [`ErrorHandler`].
///
/// ```rust,ignore
/// builder.on_error(error_fn(|_req, ctx| {
///     async move {
///         let status = ctx.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
///         Ok((status, "something went wrong").into_response())
///     }
///     .boxed()
/// }));
/// ```
pub fn error_fn<F>(f: F) -> ErrorFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Context) -> BoxFuture<'a, Result<Response, BoxError>>
        + Send
        + Sync
        + 'static,
{
    ErrorFn { f }
}

impl<F> ErrorHandler for ErrorFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Context) -> BoxFuture<'a, Result<Response, BoxError>>
        + Send
        + Sync
        + 'static,
{
    async fn on_error(&self, req: &Request, ctx: &mut Context) -> Result<Response, BoxError> {
        (self.f)(req, ctx).await
    }
}
