//! Testing utilities for wicket.
//!
//! This module provides utilities to make testing handlers and routers easier.
//!
//! # Features
//!
//! - [`request`]: Build a bodiless request for a method and URI
//! - [`Recorder`]: Hand out handlers that record their invocation order
//!
//! # Example
//!
//! ```rust,ignore
//! let recorder = Recorder::new();
//! let chain = compose![recorder.continues("auth"), recorder.responds("list", StatusCode::OK)];
//!
//! // dispatch...
//!
//! assert_eq!(recorder.calls(), ["auth", "list"]);
//! ```

use bytes::Bytes;
use http::{StatusCode, Uri};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use wicket_core::{BoxError, Context, Handler, Method, Outcome, Request};

/// Build a request with an empty body.
///
/// # Panics
///
/// Panics if `uri` is not a valid URI.
pub fn request(method: Method, uri: &'static str) -> Request {
    let mut req = Request::new(Bytes::new());
    *req.method_mut() = method.into();
    *req.uri_mut() = Uri::from_static(uri);
    req
}

/// Shared log of handler invocations.
///
/// Every handler handed out by a recorder appends its name to the same log,
/// so the log reflects the order in which handlers and deferrals actually ran.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<&'static str>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a copy of the recorded names.
    pub fn calls(&self) -> Vec<&'static str> {
        self.log().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.log().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.log().clear();
    }

    fn handler(&self, name: &'static str, behavior: Behavior) -> Recording {
        Recording {
            name,
            recorder: self.clone(),
            behavior,
        }
    }

    /// A handler that records `name` and continues.
    pub fn continues(&self, name: &'static str) -> Recording {
        self.handler(name, Behavior::Continue)
    }

    /// A handler that records `name` and responds with `status` and body `name`.
    pub fn responds(&self, name: &'static str, status: StatusCode) -> Recording {
        self.handler(name, Behavior::Respond(status))
    }

    /// A handler that records `name` and fails with the message `name`.
    pub fn fails(&self, name: &'static str) -> Recording {
        self.handler(name, Behavior::Fail)
    }

    /// A handler that records `name` and then panics with the message `name`.
    pub fn panics(&self, name: &'static str) -> Recording {
        self.handler(name, Behavior::Panic)
    }

    /// A handler that registers a deferral and continues. The deferral
    /// records `name` when it runs, not when it is registered.
    pub fn defers(&self, name: &'static str) -> Recording {
        self.handler(name, Behavior::Defer)
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("calls", &*self.log())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Continue,
    Respond(StatusCode),
    Fail,
    Panic,
    Defer,
}

/// A handler handed out by a [`Recorder`].
#[derive(Debug, Clone)]
pub struct Recording {
    name: &'static str,
    recorder: Recorder,
    behavior: Behavior,
}

impl Handler for Recording {
    async fn handle(&self, _req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        let name = self.name;
        match self.behavior {
            Behavior::Defer => {
                let recorder = self.recorder.clone();
                ctx.defer(move |_res| recorder.log().push(name));
                return Ok(Outcome::Continue);
            }
            _ => self.recorder.log().push(name),
        }

        match self.behavior {
            Behavior::Respond(status) => Ok(Outcome::respond((status, name))),
            Behavior::Fail => Err(name.into()),
            Behavior::Panic => panic!("{name}"),
            Behavior::Continue | Behavior::Defer => Ok(Outcome::Continue),
        }
    }
}
