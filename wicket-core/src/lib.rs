//! # wicket-core
//!
//! Core contracts for the wicket request dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! collaborators (storage adapters, auth helpers, header middleware) that only
//! need to speak the handler and context contracts, not the dispatch engine.
//!
//! # Request Lifecycle
//!
//! A single dispatch moves through four stages, each backed by a contract
//! defined here:
//!
//! ## Stage 1: Handler ([`Handler`])
//!
//! Every piece of request-handling code, whether a prepare hook, a routed
//! endpoint, or one link of a composed chain, is a `Handler`. It receives the
//! request and the per-request [`Context`] and returns an [`Outcome`].
//!
//! ## Stage 2: Outcome ([`Outcome`])
//!
//! `Continue` hands control to whatever comes next; `Respond` short-circuits with
//! a terminal [`Response`]. Values such as `()`, `&'static str` or
//! `Option<Response>` convert through [`IntoOutcome`].
//!
//! ## Stage 3: Context ([`Context`])
//!
//! Per-request mutable state: the URL, extracted route [`Params`], opaque
//! bindings for external resources, and the [`DeferQueue`].
//!
//! ## Stage 4: Deferral ([`Deferral`])
//!
//! Callbacks registered through [`Context::defer`] run after the handler, in
//! reverse registration order, and may adjust the outgoing response headers.
//!
//! # Error Types
//!
//! - [`WicketError`] - Top-level error returned by dispatch
//! - [`RegistrationError`] - Misuse of the registration API
//! - [`HandlerError`] - Faults raised by handlers and prepare hooks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod defer;
mod error;
mod handler;
mod method;
mod outcome;
mod response;

// Re-exports
pub use context::{Context, Params};
pub use defer::{DeferAsync, DeferFn, DeferQueue, Deferral};
pub use error::{BoxError, HandlerError, RegistrationError, WicketError};
pub use handler::{BoxHandler, DynHandler, Handler, HandlerFn, handler_fn};
pub use method::Method;
pub use outcome::{IntoOutcome, Outcome};
pub use response::{Body, IntoResponse, Request, Response};

/// Re-exported so collaborators can name boxed futures without a direct
/// `futures` dependency.
pub use futures::future::BoxFuture;
