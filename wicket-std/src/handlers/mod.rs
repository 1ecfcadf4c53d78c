//! Standard handler implementations.

pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;
pub mod tracing;

pub use self::tracing::Traced;
pub use logging::Logging;
#[cfg(feature = "timeout")]
pub use timeout::{Timeout, TimeoutError};
