//! Handler outcomes and outcome conversion.

use crate::{
    error::BoxError,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::StatusCode;

/// Result of handler execution indicating whether to continue or respond.
///
/// This is the short-circuit contract shared by prepare hooks, composed
/// chains and routed handlers.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to send yet; control passes to whatever runs next.
    Continue,
    /// A terminal response; remaining handlers are skipped.
    Respond(Response),
}

impl Outcome {
    /// Build a [`Outcome::Respond`] from anything convertible into a response.
    pub fn respond(res: impl IntoResponse) -> Self {
        Outcome::Respond(res.into_response())
    }

    /// Returns `true` if this is [`Outcome::Continue`].
    pub fn is_continue(&self) -> bool {
        matches!(self, Outcome::Continue)
    }

    /// Returns the response, if any.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Outcome::Continue => None,
            Outcome::Respond(res) => Some(res),
        }
    }
}

impl From<Response> for Outcome {
    fn from(res: Response) -> Self {
        Outcome::Respond(res)
    }
}

/// Trait for converting a handler's output into an [`Outcome`].
///
/// # Default Implementations
///
/// - `()` → Continue
/// - `Outcome` → As is
/// - `Response`, `&'static str`, `String`, `Bytes`, `Vec<u8>`, `StatusCode`,
///   `(StatusCode, T)` → Respond
/// - `Option<T>` → Respond with `T` when `Some`, Continue when `None`
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoOutcome`",
    label = "missing `IntoOutcome` implementation",
    note = "IntoOutcome must implement the `into_outcome` method."
)]
pub trait IntoOutcome {
    /// Convert the output into an outcome or a handler fault.
    fn into_outcome(self) -> Result<Outcome, BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Continue)
    }
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(self)
    }
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Respond(self))
    }
}

macro_rules! respond_with {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> Result<Outcome, BoxError> {
                    Ok(Outcome::Respond(self.into_response()))
                }
            }
        )*
    };
}

respond_with!(&'static str, String, Bytes, Vec<u8>, StatusCode);

impl<T: IntoResponse> IntoOutcome for (StatusCode, T) {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Respond(self.into_response()))
    }
}

impl<T: IntoResponse> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(match self {
            Some(t) => Outcome::Respond(t.into_response()),
            None => Outcome::Continue,
        })
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        match self {
            Ok(t) => t.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}
