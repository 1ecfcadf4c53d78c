//! Deferred post-handler callbacks.

use crate::{error::BoxError, response::Response};
use futures::future::{self, BoxFuture};

/// A callback that runs once against the outgoing response.
///
/// Deferrals are registered through [`Context::defer`] or
/// [`Context::defer_async`] and consumed by the dispatcher after the handler
/// has produced a response.
///
/// [`Context::defer`]: crate::Context::defer
/// [`Context::defer_async`]: crate::Context::defer_async
pub trait Deferral: Send + 'static {
    /// Run the deferral, consuming it.
    fn run<'a>(self: Box<Self>, res: &'a mut Response) -> BoxFuture<'a, Result<(), BoxError>>;
}

/// A synchronous deferral built from a closure.
pub struct DeferFn<F> {
    f: F,
}

impl<F> DeferFn<F>
where
    F: FnOnce(&mut Response) + Send + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Deferral for DeferFn<F>
where
    F: FnOnce(&mut Response) + Send + 'static,
{
    fn run<'a>(self: Box<Self>, res: &'a mut Response) -> BoxFuture<'a, Result<(), BoxError>> {
        let Self { f } = *self;
        f(res);
        Box::pin(future::ready(Ok(())))
    }
}

/// An asynchronous deferral built from a closure returning a boxed future.
pub struct DeferAsync<F> {
    f: F,
}

impl<F> DeferAsync<F>
where
    F: for<'a> FnOnce(&'a mut Response) -> BoxFuture<'a, Result<(), BoxError>> + Send + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Deferral for DeferAsync<F>
where
    F: for<'a> FnOnce(&'a mut Response) -> BoxFuture<'a, Result<(), BoxError>> + Send + 'static,
{
    fn run<'a>(self: Box<Self>, res: &'a mut Response) -> BoxFuture<'a, Result<(), BoxError>> {
        let Self { f } = *self;
        f(res)
    }
}

/// Ordered list of pending deferrals for one request.
///
/// Registration appends; [`DeferQueue::pop`] yields the most recently
/// registered deferral first.
#[derive(Default)]
pub struct DeferQueue {
    items: Vec<Box<dyn Deferral>>,
}

impl DeferQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a deferral.
    pub fn push<D: Deferral>(&mut self, deferral: D) {
        self.items.push(Box::new(deferral));
    }

    /// Remove the most recently registered deferral.
    pub fn pop(&mut self) -> Option<Box<dyn Deferral>> {
        self.items.pop()
    }

    /// Number of pending deferrals.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl std::fmt::Debug for DeferQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferQueue")
            .field("len", &self.items.len())
            .finish()
    }
}
