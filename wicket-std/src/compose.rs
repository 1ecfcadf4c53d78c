//! Middleware composition.
//!
//! Folds an ordered list of handlers into a single handler with short-circuit
//! semantics: each link runs in turn with the same request and context, the
//! first [`Outcome::Respond`] ends the chain, and a chain in which every link
//! continues itself continues.
//!
//! Two flavours are provided:
//!
//! - [`Chain`] / [`End`], built with the [`compose!`](crate::compose!) macro,
//!   are fully static and inline the whole chain.
//! - [`Compose`] holds type-erased handlers and is assembled at runtime.

use std::sync::Arc;
use wicket_core::{BoxError, BoxHandler, Context, Handler, Outcome, Request};

/// Empty chain terminator. Always continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct End;

/// A handler followed by the rest of the chain.
#[derive(Debug, Clone, Copy)]
pub struct Chain<H, T> {
    /// The first handler.
    pub head: H,
    /// The remaining handlers.
    pub tail: T,
}

impl Handler for End {
    async fn handle(&self, _req: &Request, _ctx: &mut Context) -> Result<Outcome, BoxError> {
        Ok(Outcome::Continue)
    }
}

impl<H, T> Handler for Chain<H, T>
where
    H: Handler,
    T: Handler,
{
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        match self.head.handle(req, ctx).await? {
            Outcome::Respond(res) => Ok(Outcome::Respond(res)),
            Outcome::Continue => self.tail.handle(req, ctx).await,
        }
    }
}

/// Trait for computing chain length at compile time.
pub trait ChainLen {
    /// Number of handlers in the chain.
    const LEN: usize;
}

impl ChainLen for End {
    const LEN: usize = 0;
}

impl<H, T: ChainLen> ChainLen for Chain<H, T> {
    const LEN: usize = 1 + T::LEN;
}

/// Compose handlers into a static [`Chain`].
///
/// # Example
/// ```ignore
/// let guarded = compose![Logging::new(), require_auth, list_items];
/// router.get("/items", guarded)?;
/// ```
#[macro_export]
macro_rules! compose {
    () => { $crate::compose::End };
    ($handler:expr $(,)?) => {
        $crate::compose::Chain {
            head: $handler,
            tail: $crate::compose::End,
        }
    };
    ($handler:expr, $($rest:expr),+ $(,)?) => {
        $crate::compose::Chain {
            head: $handler,
            tail: $crate::compose!($($rest),+),
        }
    };
}

/// A runtime-assembled composition of type-erased handlers.
#[derive(Clone, Default)]
pub struct Compose {
    handlers: Vec<BoxHandler>,
}

impl Compose {
    /// Create an empty composition. Until a handler is added it continues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler.
    pub fn with<H: Handler>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Append an already type-erased handler.
    pub fn push(&mut self, handler: BoxHandler) {
        self.handlers.push(handler);
    }

    /// Number of composed handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing was composed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl FromIterator<BoxHandler> for Compose {
    fn from_iter<I: IntoIterator<Item = BoxHandler>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for Compose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compose")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Handler for Compose {
    async fn handle(&self, req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        for (position, handler) in self.handlers.iter().enumerate() {
            if let Outcome::Respond(res) = (**handler).handle_dyn(req, ctx).await? {
                tracing::trace!(position, "composed handler responded");
                return Ok(Outcome::Respond(res));
            }
        }
        Ok(Outcome::Continue)
    }
}

/// Compose type-erased handlers in order.
pub fn compose(handlers: impl IntoIterator<Item = BoxHandler>) -> Compose {
    handlers.into_iter().collect()
}
