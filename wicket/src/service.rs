//! Tower integration for wicket.
//!
//! [`RouterService`] exposes a [`Router`] as a `tower::Service`, so a router
//! can sit behind any tower-based host or middleware stack.
//!
//! # Example
//!
//! ```rust,ignore
//! use tower::ServiceExt;
//! use wicket::service::RouterService;
//!
//! let service = RouterService::new(router);
//! let res = service.oneshot(request).await?;
//! ```

use crate::router::Router;
use futures::{FutureExt, future::BoxFuture};
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use wicket_core::{Request, Response, WicketError};

/// Wraps a shared [`Router`] as a tower `Service`.
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    /// Create a new `RouterService`.
    pub fn new(router: impl Into<Arc<Router>>) -> Self {
        Self {
            router: router.into(),
        }
    }

    /// Get a reference to the inner router.
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl tower::Service<Request> for RouterService {
    type Response = Response;
    type Error = WicketError;
    type Future = BoxFuture<'static, Result<Response, WicketError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Routers are always ready
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let router = Arc::clone(&self.router);
        async move { router.run(request).await }.boxed()
    }
}
