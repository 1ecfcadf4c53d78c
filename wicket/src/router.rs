//! Router registration and dispatch.
//!
//! Routes, mounts and hooks are registered on a [`RouterBuilder`], which is
//! frozen into an immutable [`Router`]. A router is `Send + Sync` and is
//! typically shared behind an `Arc`.
//!
//! # Dispatch
//!
//! For each request:
//!
//! 1. The prepare hook runs, if any. A response from it skips routing.
//! 2. Mounts are checked in registration order. A hit rewrites the path and
//!    hands the rest of the request to the mounted router.
//! 3. The route table is consulted; a miss is a 404 via the error handler.
//! 4. The matched handler runs with the extracted params. A fault is a 500
//!    via the error handler; `Continue` is an empty `200 OK`.
//! 5. Deferrals run, most recent first.
//! 6. The response is finalized for HEAD and bodiless statuses.

use crate::{
    config::RouterConfig,
    error_handler::{DefaultErrorHandler, DynErrorHandler, ErrorHandler},
    mount::Mounts,
};
use bytes::Bytes;
use futures::{FutureExt, future::BoxFuture};
use http::StatusCode;
use std::{panic::AssertUnwindSafe, sync::Arc};
use wicket_core::{
    BoxHandler, Context, Handler, HandlerError, Method, Outcome, RegistrationError, Request,
    Response, WicketError,
};
use wicket_std::{
    deferral::drain,
    finalize::finalize,
    pattern::RoutePattern,
    table::{Found, RouteTable, RouteTableBuilder},
};

/// Builder for [`Router`].
///
/// Registration methods report misuse synchronously and return the builder
/// for chaining:
///
/// ```rust,ignore
/// let mut builder = Router::builder();
/// builder
///     .get("/items", list_items)?
///     .get("/items/:id", show_item)?
///     .post("/items", create_item)?;
/// let router = builder.build();
/// ```
pub struct RouterBuilder {
    routes: RouteTableBuilder<BoxHandler>,
    mounts: Mounts,
    prepare: Option<BoxHandler>,
    on_error: Option<Arc<dyn DynErrorHandler>>,
    config: RouterConfig,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            routes: RouteTableBuilder::new(),
            mounts: Mounts::default(),
            prepare: None,
            on_error: None,
            config: RouterConfig::default(),
        }
    }

    /// Register a handler for a method given by name, such as `"GET"`.
    ///
    /// Method names are matched case-insensitively; unknown names are
    /// rejected.
    pub fn add<H: Handler>(
        &mut self,
        method: &str,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        let method: Method = method.parse()?;
        self.route(method, pattern, handler)
    }

    /// Register a handler for `method` and `pattern`.
    pub fn route<H: Handler>(
        &mut self,
        method: Method,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.routes.insert(method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a `GET` route.
    pub fn get<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Get, pattern, handler)
    }

    /// Register a `HEAD` route. Without one, HEAD requests use the `GET` route.
    pub fn head<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Head, pattern, handler)
    }

    /// Register a `POST` route.
    pub fn post<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Post, pattern, handler)
    }

    /// Register a `PUT` route.
    pub fn put<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Put, pattern, handler)
    }

    /// Register a `PATCH` route.
    pub fn patch<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Patch, pattern, handler)
    }

    /// Register a `DELETE` route.
    pub fn delete<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Delete, pattern, handler)
    }

    /// Register an `OPTIONS` route.
    pub fn options<H: Handler>(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.route(Method::Options, pattern, handler)
    }

    /// Delegate every path under `prefix` to `router`.
    ///
    /// `prefix` must look like `/segment/`. Registering a prefix again
    /// replaces the earlier router.
    pub fn mount(
        &mut self,
        prefix: &str,
        router: impl Into<Arc<Router>>,
    ) -> Result<&mut Self, RegistrationError> {
        self.mounts.insert(prefix, router.into())?;
        Ok(self)
    }

    /// Set the hook that runs once per request before routing.
    pub fn prepare<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.prepare = Some(Arc::new(handler));
        self
    }

    /// Replace the default error handler.
    pub fn on_error<E: ErrorHandler>(&mut self, handler: E) -> &mut Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Set the router configuration.
    pub fn config(&mut self, config: RouterConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Get the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the builder into a [`Router`].
    pub fn build(self) -> Router {
        let on_error = self.on_error.unwrap_or_else(|| {
            Arc::new(DefaultErrorHandler::new(self.config.status_text().clone()))
        });

        tracing::debug!(
            routes = self.routes.len(),
            mounts = self.mounts.len(),
            prepare = self.prepare.is_some(),
            "router built"
        );

        Router {
            routes: self.routes.build(),
            mounts: self.mounts,
            prepare: self.prepare,
            on_error,
            config: self.config,
        }
    }
}

/// An immutable request dispatcher.
pub struct Router {
    routes: RouteTable<BoxHandler>,
    mounts: Mounts,
    prepare: Option<BoxHandler>,
    on_error: Arc<dyn DynErrorHandler>,
    config: RouterConfig,
}

impl Router {
    /// Start building a router.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// The router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Dispatch a request with a fresh [`Context`].
    ///
    /// Returns `Err` only if the request URI cannot form a URL or the error
    /// handler fails.
    pub async fn run(&self, req: Request) -> Result<Response, WicketError> {
        let mut ctx = Context::from_request(&req)?;
        self.run_with(&req, &mut ctx).await
    }

    /// Dispatch a request against a caller-supplied context.
    ///
    /// Hosts use this to pass bindings; mount delegation uses it to hand the
    /// same context to the mounted router.
    pub fn run_with<'a>(
        &'a self,
        req: &'a Request,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, Result<Response, WicketError>> {
        self.dispatch(req, ctx).boxed()
    }

    async fn dispatch(&self, req: &Request, ctx: &mut Context) -> Result<Response, WicketError> {
        let mut res = match self.run_prepare(req, ctx).await? {
            Some(res) => res,
            None => {
                if let Some((prefix, router, rest)) = self.mounts.resolve(ctx.path()) {
                    tracing::debug!(prefix, path = %ctx.path(), rewritten = %rest, "delegating to mount");
                    ctx.url_mut().set_path(&rest);
                    return router.run_with(req, ctx).await;
                }
                self.run_route(req, ctx).await?
            }
        };

        drain(ctx.deferred_mut(), &mut res).await;

        let res = finalize(res, req.method() == http::Method::HEAD);
        tracing::debug!(
            method = %req.method(),
            path = %ctx.path(),
            status = res.status().as_u16(),
            "request dispatched"
        );
        Ok(res)
    }

    async fn run_prepare(
        &self,
        req: &Request,
        ctx: &mut Context,
    ) -> Result<Option<Response>, WicketError> {
        let Some(prepare) = &self.prepare else {
            return Ok(None);
        };

        match self.invoke(prepare, req, ctx).await {
            Ok(outcome) => {
                if !outcome.is_continue() {
                    tracing::trace!("prepare hook responded");
                }
                Ok(outcome.into_response())
            }
            Err(err) => self.fault(req, ctx, err).await.map(Some),
        }
    }

    async fn run_route(&self, req: &Request, ctx: &mut Context) -> Result<Response, WicketError> {
        let found = Method::try_from(req.method())
            .ok()
            .and_then(|method| self.lookup(method, ctx.path()));

        let Some(Found { params, value: handler }) = found else {
            tracing::debug!(method = %req.method(), path = %ctx.path(), "no route matched");
            return self.render_error(req, ctx, StatusCode::NOT_FOUND).await;
        };

        tracing::trace!(method = %req.method(), path = %ctx.path(), params = params.len(), "route matched");
        *ctx.params_mut() = params;

        match self.invoke(handler, req, ctx).await {
            Ok(Outcome::Respond(res)) => Ok(res),
            Ok(Outcome::Continue) => Ok(Response::new(Some(Bytes::new()))),
            Err(err) => self.fault(req, ctx, err).await,
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<Found<'_, BoxHandler>> {
        self.routes.find(method, path).or_else(|| {
            (method == Method::Head)
                .then(|| self.routes.find(Method::Get, path))
                .flatten()
        })
    }

    async fn invoke(
        &self,
        handler: &BoxHandler,
        req: &Request,
        ctx: &mut Context,
    ) -> Result<Outcome, HandlerError> {
        let fut = (**handler).handle_dyn(req, ctx);
        if !self.config.catch_panics() {
            return fut.await.map_err(HandlerError::from);
        }

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => result.map_err(HandlerError::from),
            Err(payload) => Err(HandlerError::from_panic(payload)),
        }
    }

    async fn fault(
        &self,
        req: &Request,
        ctx: &mut Context,
        err: HandlerError,
    ) -> Result<Response, WicketError> {
        tracing::error!(error = %err, method = %req.method(), path = %ctx.path(), "handler fault");
        ctx.set_error(err);
        self.render_error(req, ctx, StatusCode::INTERNAL_SERVER_ERROR)
            .await
    }

    async fn render_error(
        &self,
        req: &Request,
        ctx: &mut Context,
        status: StatusCode,
    ) -> Result<Response, WicketError> {
        ctx.set_status(status);
        self.on_error
            .on_error_dyn(req, ctx)
            .await
            .map_err(WicketError::ErrorHandler)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("mounts", &self.mounts.prefixes().collect::<Vec<_>>())
            .field("prepare", &self.prepare.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_std::testing::{Recorder, request};

    #[test]
    fn test_unknown_method_rejected() {
        let recorder = Recorder::new();
        let mut builder = Router::builder();
        let err = builder
            .add("BREW", "/coffee", recorder.continues("brew"))
            .err()
            .unwrap();
        assert!(matches!(err, RegistrationError::UnknownMethod(m) if m == "BREW"));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_add_is_case_insensitive() {
        let recorder = Recorder::new();
        let mut builder = Router::builder();
        builder
            .add("get", "/a", recorder.continues("a"))
            .unwrap()
            .add("Post", "/a", recorder.continues("b"))
            .unwrap();
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_bad_mount_prefix_rejected() {
        let mut builder = Router::builder();
        let err = builder.mount("api", Router::builder().build()).err().unwrap();
        assert!(matches!(err, RegistrationError::InvalidMountPrefix(_)));
    }

    #[tokio::test]
    async fn test_head_falls_back_to_get() {
        let recorder = Recorder::new();
        let mut builder = Router::builder();
        builder
            .get("/page", recorder.responds("page", StatusCode::OK))
            .unwrap();
        let router = builder.build();

        let res = router.run(request(Method::Head, "/page")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.body().is_none());
        assert_eq!(res.headers()[http::header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(recorder.calls(), ["page"]);
    }

    #[tokio::test]
    async fn test_head_route_preferred() {
        let recorder = Recorder::new();
        let mut builder = Router::builder();
        builder
            .get("/page", recorder.responds("get", StatusCode::OK))
            .unwrap()
            .head("/page", recorder.responds("head", StatusCode::OK))
            .unwrap();
        let router = builder.build();

        router.run(request(Method::Head, "/page")).await.unwrap();
        assert_eq!(recorder.calls(), ["head"]);
    }

    #[tokio::test]
    async fn test_unsupported_request_method_is_not_found() {
        let mut builder = Router::builder();
        builder.get("/", Recorder::new().continues("root")).unwrap();
        let router = builder.build();

        let mut req = request(Method::Get, "/");
        *req.method_mut() = http::Method::from_bytes(b"PURGE").unwrap();
        let res = router.run(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_panics_propagate_when_not_caught() {
        let recorder = Recorder::new();
        let mut builder = Router::builder();
        builder
            .config(RouterConfig::new().with_catch_panics(false))
            .get("/", recorder.panics("kaboom"))
            .unwrap();
        let router = builder.build();

        let result = AssertUnwindSafe(router.run(request(Method::Get, "/")))
            .catch_unwind()
            .await;
        assert!(result.is_err());
    }
}
