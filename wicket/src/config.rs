//! Router configuration.

use wicket_std::status::StatusText;

/// Per-router settings.
///
/// # Example
///
/// ```rust,ignore
/// use http::StatusCode;
/// use wicket::{RouterConfig, StatusText};
///
/// let config = RouterConfig::new()
///     .with_status_text(StatusText::new().with(StatusCode::NOT_FOUND, "no such page"))
///     .with_catch_panics(false);
/// ```
#[derive(Debug, Clone)]
pub struct RouterConfig {
    status_text: StatusText,
    catch_panics: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            status_text: StatusText::new(),
            catch_panics: true,
        }
    }
}

impl RouterConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canned text used by the default error handler.
    pub fn with_status_text(mut self, status_text: StatusText) -> Self {
        self.status_text = status_text;
        self
    }

    /// Set whether panics in the prepare hook or a handler are turned into
    /// 500 responses. Enabled by default.
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// The status-text table.
    pub fn status_text(&self) -> &StatusText {
        &self.status_text
    }

    /// Whether handler panics are caught.
    pub fn catch_panics(&self) -> bool {
        self.catch_panics
    }
}
