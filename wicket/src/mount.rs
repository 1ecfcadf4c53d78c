//! Sub-router mounting.
//!
//! A mount hands every request whose path falls under a prefix to another
//! router, after stripping the prefix from the path.

use crate::router::Router;
use std::sync::Arc;
use wicket_core::RegistrationError;

/// Check that `prefix` has the shape `/segment/` (one or more non-empty
/// segments, leading and trailing `/`).
pub fn validate_prefix(prefix: &str) -> Result<(), RegistrationError> {
    let inner = prefix
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .filter(|p| !p.is_empty());

    match inner {
        Some(inner) if inner.split('/').all(|segment| !segment.is_empty()) => Ok(()),
        _ => Err(RegistrationError::InvalidMountPrefix(prefix.to_string())),
    }
}

/// Strip a mount prefix from `path`.
///
/// The comparison treats `path` as if it ended with `/`, so `/api` falls
/// under `/api/`. An empty remainder becomes `/`.
pub fn strip_mount_prefix<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let base = prefix.strip_suffix('/').unwrap_or(prefix);
    match path.strip_prefix(base)? {
        "" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

/// Registered mounts, checked in registration order.
#[derive(Default)]
pub(crate) struct Mounts {
    entries: Vec<(String, Arc<Router>)>,
}

impl Mounts {
    /// Register `router` under `prefix`, replacing an earlier registration of
    /// the same prefix in place.
    pub(crate) fn insert(
        &mut self,
        prefix: &str,
        router: Arc<Router>,
    ) -> Result<(), RegistrationError> {
        validate_prefix(prefix)?;

        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| p == prefix) {
            tracing::debug!(prefix, "mount replaced");
            entry.1 = router;
        } else {
            tracing::debug!(prefix, "mount registered");
            self.entries.push((prefix.to_string(), router));
        }
        Ok(())
    }

    /// Find the first mount covering `path`, returning its prefix, router and
    /// the rewritten path.
    pub(crate) fn resolve(&self, path: &str) -> Option<(&str, &Arc<Router>, String)> {
        self.entries.iter().find_map(|(prefix, router)| {
            strip_mount_prefix(path, prefix).map(|rest| (prefix.as_str(), router, rest.to_string()))
        })
    }

    pub(crate) fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
