//! Canned status text.

use http::StatusCode;
use std::collections::HashMap;

/// Status-text table used when rendering error responses.
///
/// Owned by a router's configuration, so overrides never leak between
/// routers. Lookups fall back to the canonical reason phrase, then to
/// `"Unknown"`.
#[derive(Debug, Clone, Default)]
pub struct StatusText {
    overrides: HashMap<StatusCode, String>,
}

impl StatusText {
    /// A table with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the text for `status`.
    pub fn with(mut self, status: StatusCode, text: impl Into<String>) -> Self {
        self.set(status, text);
        self
    }

    /// Override the text for `status` in place.
    pub fn set(&mut self, status: StatusCode, text: impl Into<String>) {
        self.overrides.insert(status, text.into());
    }

    /// Text for `status`.
    pub fn get(&self, status: StatusCode) -> &str {
        self.overrides
            .get(&status)
            .map(String::as_str)
            .or_else(|| status.canonical_reason())
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_fallback() {
        let table = StatusText::new();
        assert_eq!(table.get(StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(table.get(StatusCode::INTERNAL_SERVER_ERROR), "Internal Server Error");
    }

    #[test]
    fn test_override() {
        let table = StatusText::new().with(StatusCode::NOT_FOUND, "nothing here");
        assert_eq!(table.get(StatusCode::NOT_FOUND), "nothing here");
        assert_eq!(table.get(StatusCode::BAD_GATEWAY), "Bad Gateway");
    }

    #[test]
    fn test_unknown_code() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(StatusText::new().get(status), "Unknown");
    }
}
