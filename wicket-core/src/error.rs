//! Error types for wicket.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`WicketError`] - Top-level error type returned by dispatch
//! - [`RegistrationError`] - Invalid arguments to the registration API
//! - [`HandlerError`] - Faults raised while a handler runs

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for wicket operations.
///
/// Dispatch recovers every per-request fault up to the error handler. This
/// type only escapes `run` when that boundary itself fails.
#[derive(Error, Debug)]
pub enum WicketError {
    /// The router was misused while it was being built.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// The error handler failed while rendering an error response.
    #[error("error handler failed")]
    ErrorHandler(#[source] BoxError),

    /// The request URI could not be turned into a URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors reported synchronously by the registration API.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The method name is not one of the supported HTTP methods.
    #[error("unknown http method: {0}")]
    UnknownMethod(String),

    /// The route pattern could not be compiled.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as registered.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The mount prefix is not of the form `/segment/`.
    #[error("invalid mount prefix {0:?}: expected a leading and trailing `/`")]
    InvalidMountPrefix(String),
}

impl RegistrationError {
    /// Shorthand for [`RegistrationError::InvalidPattern`].
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        RegistrationError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}

/// Faults raised by a prepare hook or a matched handler.
///
/// The dispatcher attaches the fault to the request context before invoking
/// the error handler with status 500.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error(transparent)]
    Failed(BoxError),

    /// The handler panicked during execution.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl HandlerError {
    /// Build a [`HandlerError::Panic`] from a caught unwind payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        HandlerError::Panic(message)
    }
}

// Convenience conversions
impl From<BoxError> for HandlerError {
    fn from(err: BoxError) -> Self {
        HandlerError::Failed(err)
    }
}
