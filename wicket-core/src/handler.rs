//! # Handler
//!
//! The single shape shared by every piece of request-handling code: prepare
//! hooks, routed endpoints, and each link of a composed chain.
//!
//! # Usage Patterns
//!
//! 1. **Struct implementation**: `impl Handler for MyHandler`
//! 2. **Closure**: `handler_fn(|req, ctx| async move { ... }.boxed())`
//! 3. **Attribute macro**: `#[wicket::handler] async fn hello(req: &Request) -> &'static str`
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Handler`] uses native `async fn` for zero-cost static dispatch; chains
//! built with `compose!` are fully inlined. The route table stores handlers
//! behind [`DynHandler`], the object-safe counterpart.

use crate::{
    context::Context,
    error::BoxError,
    outcome::Outcome,
    response::Request,
};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};

/// A request handler.
///
/// Returning [`Outcome::Continue`] passes control on; returning
/// [`Outcome::Respond`] ends the chain. An `Err` is a handler fault, which the
/// dispatcher turns into a 500 through the error handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Handler`",
    label = "missing `Handler` implementation",
    note = "Handlers must implement `handle`, or be built with `handler_fn` or `#[handler]`."
)]
pub trait Handler: Send + Sync + 'static {
    /// Handle one request.
    fn handle(
        &self,
        req: &Request,
        ctx: &mut Context,
    ) -> impl Future<Output = Result<Outcome, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Handler`].
///
/// Use this trait when you need runtime polymorphism (e.g., in a route table).
pub trait DynHandler: Send + Sync + 'static {
    /// Handle one request (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        req: &'a Request,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, Result<Outcome, BoxError>>;
}

/// A shared, type-erased handler.
pub type BoxHandler = Arc<dyn DynHandler>;

// Blanket implementation: Any type implementing Handler implements DynHandler automatically.
impl<T: Handler> DynHandler for T {
    fn handle_dyn<'a>(
        &'a self,
        req: &'a Request,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, Result<Outcome, BoxError>> {
        Box::pin(self.handle(req, ctx))
    }
}

// Allow a shared dyn handler to be used where Handler is expected.
impl Handler for Arc<dyn DynHandler> {
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        (**self).handle_dyn(req, ctx).await
    }
}

/// A [`Handler`] built from a closure. See [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure returning a boxed future as a [`Handler`].
///
/// ```rust,ignore
/// use futures::FutureExt;
///
/// let hello = handler_fn(|_req, ctx| {
///     async move {
///         let name = ctx.params().get("name").unwrap_or("world").to_string();
///         Ok(Outcome::respond(format!("hello {name}")))
///     }
///     .boxed()
/// });
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Context) -> BoxFuture<'a, Result<Outcome, BoxError>>
        + Send
        + Sync
        + 'static,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Context) -> BoxFuture<'a, Result<Outcome, BoxError>>
        + Send
        + Sync
        + 'static,
{
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        (self.f)(req, ctx).await
    }
}
