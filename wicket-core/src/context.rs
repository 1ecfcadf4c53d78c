//! Per-request context.
//!
//! A [`Context`] is created fresh for every dispatch and discarded when the
//! dispatch returns. Collaborators read and write it through a small surface:
//! the URL, route parameters, opaque bindings, and the deferral queue.

use crate::{
    defer::{DeferAsync, DeferFn, DeferQueue},
    error::{BoxError, HandlerError, WicketError},
    response::{Request, Response},
};
use futures::future::BoxFuture;
use http::{Extensions, StatusCode, header::HOST};
use std::collections::{HashMap, hash_map};
use url::Url;

/// Parameters extracted from a matched route pattern.
///
/// An optional parameter that did not participate in the match has no entry;
/// it is never present with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: HashMap<String, String>,
}

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Returns `true` if the parameter was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Insert a parameter, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Per-request mutable state shared by the prepare hook, the matched handler,
/// and any composed sub-handlers.
pub struct Context {
    url: Url,
    params: Params,
    bindings: Extensions,
    deferred: DeferQueue,
    status: Option<StatusCode>,
    error: Option<HandlerError>,
}

impl Context {
    /// Create a context for the given URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            params: Params::new(),
            bindings: Extensions::new(),
            deferred: DeferQueue::new(),
            status: None,
            error: None,
        }
    }

    /// Derive a context from a request.
    ///
    /// Absolute request URIs are used as-is. Origin-form URIs (`/path?query`)
    /// are resolved against the `Host` header, falling back to `localhost`.
    pub fn from_request(req: &Request) -> Result<Self, WicketError> {
        Ok(Self::new(request_url(req)?))
    }

    /// Attach bindings for external resources (stores, keys, clients).
    pub fn with_bindings(mut self, bindings: Extensions) -> Self {
        self.bindings = bindings;
        self
    }

    /// The request URL. Mount delegation rewrites its path.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Mutable access to the request URL.
    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    /// Shorthand for `self.url().path()`.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Route parameters, populated just before the matched handler runs.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access to the route parameters.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Opaque bindings. The dispatcher never reads or writes these.
    pub fn bindings(&self) -> &Extensions {
        &self.bindings
    }

    /// Mutable access to the bindings.
    pub fn bindings_mut(&mut self) -> &mut Extensions {
        &mut self.bindings
    }

    /// Register a callback to run against the response after the handler.
    ///
    /// Callbacks run in reverse registration order. They may adjust headers;
    /// replacing the body is unsupported.
    pub fn defer<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Response) + Send + 'static,
    {
        self.deferred.push(DeferFn::new(f));
    }

    /// Register an asynchronous deferral. See [`Context::defer`].
    ///
    /// A deferral that returns `Err` is logged and skipped; the remaining
    /// deferrals still run and the response is still returned.
    pub fn defer_async<F>(&mut self, f: F)
    where
        F: for<'a> FnOnce(&'a mut Response) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + 'static,
    {
        self.deferred.push(DeferAsync::new(f));
    }

    /// The pending deferral queue.
    pub fn deferred(&self) -> &DeferQueue {
        &self.deferred
    }

    /// Mutable access to the deferral queue, used by the dispatcher to drain it.
    pub fn deferred_mut(&mut self) -> &mut DeferQueue {
        &mut self.deferred
    }

    /// Status the dispatcher is reporting through the error handler, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Set the status reported to the error handler.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// The fault raised by the prepare hook or handler, if any.
    pub fn error(&self) -> Option<&HandlerError> {
        self.error.as_ref()
    }

    /// Attach a fault for the error handler to inspect.
    pub fn set_error(&mut self, error: HandlerError) {
        self.error = Some(error);
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("url", &self.url.as_str())
            .field("params", &self.params)
            .field("deferred", &self.deferred.len())
            .field("status", &self.status)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

fn request_url(req: &Request) -> Result<Url, url::ParseError> {
    let uri = req.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return Url::parse(&uri.to_string());
    }

    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let host = req
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty());

    match host {
        Some(host) => Url::parse(&format!("http://{host}{path_and_query}"))
            .or_else(|_| Url::parse(&format!("http://localhost{path_and_query}"))),
        None => Url::parse(&format!("http://localhost{path_and_query}")),
    }
}
