//! # wicket - Request Dispatcher for Serverless Handlers
//!
//! `wicket` routes HTTP-style requests to async handlers. Route patterns are
//! compiled once at registration; the frozen [`Router`] is then shared
//! read-only by every in-flight request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wicket::{Context, Request, Router, handler};
//!
//! #[handler]
//! async fn show_item(_req: &Request, ctx: &mut Context) -> String {
//!     format!("item {}", ctx.params().get("id").unwrap_or("?"))
//! }
//!
//! let mut builder = Router::builder();
//! builder.get("/items/:id", show_item)?;
//! let router = builder.build();
//!
//! let res = router.run(request).await?;
//! ```
//!
//! ## Patterns
//!
//! | Pattern | Matches | Params |
//! |---------|---------|--------|
//! | `/about` | `/about` | |
//! | `/users/:id` | `/users/7` | `id` |
//! | `/foo/:bar?/:baz` | `/foo/baz`, `/foo/x/baz` | `bar` (optional), `baz` |
//! | `/movies/:title.mp4` | `/movies/dune.mp4` | `title` |
//! | `/static/*` | `/static/js/app.js` | `wild` |
//!
//! Literal routes always win over patterns; among patterns, the first one
//! registered wins.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod config;
pub mod error_handler;
pub mod mount;
pub mod router;
#[cfg(feature = "tower")]
pub mod service;

pub use wicket_core::{
    // Errors
    BoxError,
    // Handler
    BoxFuture,
    BoxHandler,
    // Context
    Context,
    // Deferral
    DeferQueue,
    Deferral,
    DynHandler,
    Handler,
    HandlerError,
    HandlerFn,
    // Response
    IntoOutcome,
    IntoResponse,
    Method,
    Outcome,
    Params,
    RegistrationError,
    Request,
    Response,
    WicketError,
    handler_fn,
};

pub use config::RouterConfig;
pub use error_handler::{DefaultErrorHandler, ErrorFn, ErrorHandler, error_fn};
pub use router::{Router, RouterBuilder};
#[cfg(feature = "tower")]
pub use service::RouterService;

// Composition
pub use wicket_std::{
    compose,
    compose::{Chain, Compose, End},
};

pub use wicket_std::{
    finalize::{finalize, is_bodiless},
    pattern::{CompiledRoute, RoutePattern, WILDCARD_KEY},
    status::StatusText,
};

// Standard handlers
pub use wicket_std::handlers::{Logging, Traced};
#[cfg(feature = "timeout")]
pub use wicket_std::handlers::{Timeout, TimeoutError};

#[cfg(feature = "macros")]
pub use wicket_macros::handler;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use wicket_std::testing::*;
}

/// Prelude module - common imports for wicket.
///
/// # Usage
///
/// ```rust,ignore
/// use wicket::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Context, Handler, IntoOutcome, IntoResponse, Method, Outcome, Request, Response,
        Router, RouterBuilder, RouterConfig, compose, handler_fn,
    };
    #[cfg(feature = "macros")]
    pub use crate::handler;
}
