//! Per-method route table.
//!
//! Routes are registered through a [`RouteTableBuilder`] and frozen into an
//! immutable [`RouteTable`] before dispatch begins.
//!
//! # Lookup
//!
//! 1. Pick the branch for the request method.
//! 2. Exact-path hit in the static table → done, no params.
//! 3. Otherwise scan the dynamic list in registration order; the first
//!    pattern that matches wins.
//!
//! There is no specificity re-ordering: a general pattern registered before a
//! more specific one shadows it.

use crate::pattern::{CompiledRoute, RoutePattern};
use std::collections::HashMap;
use wicket_core::{Method, Params, RegistrationError};

/// A compiled route and the value registered for it.
#[derive(Debug)]
pub struct Entry<V> {
    route: CompiledRoute,
    value: V,
}

impl<V> Entry<V> {
    /// The compiled route.
    pub fn route(&self) -> &CompiledRoute {
        &self.route
    }

    /// The registered value.
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Routes for a single method.
#[derive(Debug)]
struct Branch<V> {
    statics: HashMap<String, Entry<V>>,
    dynamics: Vec<Entry<V>>,
}

impl<V> Default for Branch<V> {
    fn default() -> Self {
        Self {
            statics: HashMap::new(),
            dynamics: Vec::new(),
        }
    }
}

impl<V> Branch<V> {
    fn len(&self) -> usize {
        self.statics.len() + self.dynamics.len()
    }
}

/// A successful lookup.
#[derive(Debug)]
pub struct Found<'a, V> {
    /// Parameters captured by the matched pattern.
    pub params: Params,
    /// The value registered for the route.
    pub value: &'a V,
}

/// Builder for [`RouteTable`].
#[derive(Debug)]
pub struct RouteTableBuilder<V> {
    tree: HashMap<Method, Branch<V>>,
}

impl<V> Default for RouteTableBuilder<V> {
    fn default() -> Self {
        Self {
            tree: HashMap::new(),
        }
    }
}

impl<V> RouteTableBuilder<V> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and register `value` under `method`.
    ///
    /// Literal paths go to the static table; registering the same literal
    /// twice replaces the earlier value. Patterns are appended to the dynamic
    /// list, whose order decides match priority.
    pub fn insert(
        &mut self,
        method: Method,
        pattern: impl Into<RoutePattern>,
        value: V,
    ) -> Result<(), RegistrationError> {
        let pattern = pattern.into();
        let source = pattern.to_string();
        let route = CompiledRoute::compile(pattern)?;
        let branch = self.tree.entry(method).or_default();

        if route.is_static() {
            tracing::debug!(%method, pattern = %source, kind = "static", "route registered");
            if branch
                .statics
                .insert(source.clone(), Entry { route, value })
                .is_some()
            {
                tracing::debug!(%method, pattern = %source, "static route replaced");
            }
        } else {
            tracing::debug!(
                %method,
                pattern = %source,
                keys = ?route.keys(),
                priority = branch.dynamics.len(),
                kind = "dynamic",
                "route registered"
            );
            branch.dynamics.push(Entry { route, value });
        }
        Ok(())
    }

    /// Get the number of registered routes.
    pub fn len(&self) -> usize {
        self.tree.values().map(Branch::len).sum()
    }

    /// Check if the builder has no routes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the table. No routes can be added afterwards.
    pub fn build(self) -> RouteTable<V> {
        RouteTable { tree: self.tree }
    }
}

/// An immutable, thread-safe route table.
#[derive(Debug)]
pub struct RouteTable<V> {
    tree: HashMap<Method, Branch<V>>,
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self {
            tree: HashMap::new(),
        }
    }
}

impl<V> RouteTable<V> {
    /// Resolve `(method, path)` to a registered value.
    pub fn find(&self, method: Method, path: &str) -> Option<Found<'_, V>> {
        let branch = self.tree.get(&method)?;

        if let Some(entry) = branch.statics.get(path) {
            return Some(Found {
                params: Params::new(),
                value: &entry.value,
            });
        }

        branch.dynamics.iter().find_map(|entry| {
            entry.route.matches(path).map(|params| Found {
                params,
                value: &entry.value,
            })
        })
    }

    /// Returns `true` if any route is registered for `method`.
    pub fn has_method(&self, method: Method) -> bool {
        self.tree.get(&method).is_some_and(|b| b.len() > 0)
    }

    /// Get the number of registered routes.
    pub fn len(&self) -> usize {
        self.tree.values().map(Branch::len).sum()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn table(routes: &[(Method, &str, i32)]) -> RouteTable<i32> {
        let mut builder = RouteTableBuilder::new();
        for (method, pattern, value) in routes {
            builder.insert(*method, *pattern, *value).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_basic_routing() {
        let table = table(&[(Method::Get, "/hello", 1), (Method::Post, "/hello", 2)]);

        assert_eq!(table.find(Method::Get, "/hello").map(|f| *f.value), Some(1));
        assert_eq!(table.find(Method::Post, "/hello").map(|f| *f.value), Some(2));
        assert!(table.find(Method::Put, "/hello").is_none());
        assert!(table.find(Method::Get, "/unknown").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_static_beats_earlier_dynamic() {
        let table = table(&[(Method::Get, "/users/:id", 1), (Method::Get, "/users/me", 2)]);

        let found = table.find(Method::Get, "/users/me").unwrap();
        assert_eq!(*found.value, 2);
        assert!(found.params.is_empty());

        let found = table.find(Method::Get, "/users/7").unwrap();
        assert_eq!(*found.value, 1);
        assert_eq!(found.params.get("id"), Some("7"));
    }

    #[test]
    fn test_first_registered_dynamic_wins() {
        let table = table(&[
            (Method::Get, "/files/*", 1),
            (Method::Get, "/files/:name", 2),
        ]);

        let found = table.find(Method::Get, "/files/readme").unwrap();
        assert_eq!(*found.value, 1);
        assert_eq!(found.params.get("wild"), Some("readme"));
    }

    #[test]
    fn test_static_replacement() {
        let table = table(&[(Method::Get, "/", 1), (Method::Get, "/", 2)]);
        assert_eq!(table.find(Method::Get, "/").map(|f| *f.value), Some(2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_regex_route() {
        let mut builder = RouteTableBuilder::new();
        builder
            .insert(Method::Get, Regex::new(r"^/v(?P<version>\d+)/status$").unwrap(), 9)
            .unwrap();
        let table = builder.build();

        let found = table.find(Method::Get, "/v2/status").unwrap();
        assert_eq!(found.params.get("version"), Some("2"));
        assert!(table.has_method(Method::Get));
        assert!(!table.has_method(Method::Delete));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut builder: RouteTableBuilder<i32> = RouteTableBuilder::new();
        let result = builder.insert(Method::Get, "/broken/:", 1);
        assert!(matches!(result, Err(RegistrationError::InvalidPattern { .. })));
        assert!(builder.is_empty());
    }
}
