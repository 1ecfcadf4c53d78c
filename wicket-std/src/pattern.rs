//! Route pattern compilation.
//!
//! Translates a route pattern into a [`CompiledRoute`]: either an exact path
//! for the static table, or an anchored regular expression plus the ordered
//! list of parameter keys its capture groups correspond to.
//!
//! | Segment | Expression | Key |
//! |---------|------------|-----|
//! | `users` | `/users` | |
//! | `:id` | `/([^/]+?)` | `id` |
//! | `:id?` | `(?:/([^/]+?))?` | `id` |
//! | `:file.json` | `/([^/]+?)\.json` | `file` |
//! | `*` | `/(.*)` | `wild` |

use regex::Regex;
use std::fmt;
use wicket_core::{Params, RegistrationError};

/// Key reported for a `*` segment.
pub const WILDCARD_KEY: &str = "wild";

/// A route registration key.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// A literal path (`/about`) or parameterized template (`/users/:id`).
    Path(String),
    /// A pre-built expression. Parameters come from its named capture groups.
    Regex(Regex),
}

impl RoutePattern {
    /// The pattern source, as registered.
    pub fn as_str(&self) -> &str {
        match self {
            RoutePattern::Path(path) => path,
            RoutePattern::Regex(re) => re.as_str(),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RoutePattern {
    fn from(value: &str) -> Self {
        RoutePattern::Path(value.to_string())
    }
}

impl From<String> for RoutePattern {
    fn from(value: String) -> Self {
        RoutePattern::Path(value)
    }
}

impl From<&String> for RoutePattern {
    fn from(value: &String) -> Self {
        RoutePattern::Path(value.clone())
    }
}

impl From<Regex> for RoutePattern {
    fn from(value: Regex) -> Self {
        RoutePattern::Regex(value)
    }
}

/// How a compiled route recognises a path.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact string comparison. Lives in the static table.
    Exact(String),
    /// Compiled template; capture group `i + 1` feeds key `i`.
    Template(Regex),
    /// Caller-supplied expression; named capture groups feed the params.
    Raw(Regex),
}

/// A route pattern compiled once at registration time.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    keys: Vec<String>,
    matcher: Matcher,
}

impl CompiledRoute {
    /// Compile a route pattern.
    ///
    /// Patterns containing neither `:` nor `*` bypass regex compilation and
    /// match by exact comparison.
    pub fn compile(pattern: impl Into<RoutePattern>) -> Result<Self, RegistrationError> {
        match pattern.into() {
            RoutePattern::Regex(re) => Ok(Self {
                keys: re.capture_names().flatten().map(str::to_string).collect(),
                matcher: Matcher::Raw(re),
            }),
            RoutePattern::Path(path) if !path.contains([':', '*']) => Ok(Self {
                keys: Vec::new(),
                matcher: Matcher::Exact(path),
            }),
            RoutePattern::Path(path) => {
                let (expr, keys) = template_to_regex(&path)?;
                let re = Regex::new(&expr)
                    .map_err(|e| RegistrationError::invalid_pattern(path.as_str(), e))?;
                Ok(Self {
                    keys,
                    matcher: Matcher::Template(re),
                })
            }
        }
    }

    /// Parameter names, in pattern order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The underlying matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Returns `true` if this route belongs in the static table.
    pub fn is_static(&self) -> bool {
        matches!(self.matcher, Matcher::Exact(_))
    }

    /// Match a path, returning the captured parameters.
    ///
    /// Optional parameters that did not participate are left out of the map.
    pub fn matches(&self, path: &str) -> Option<Params> {
        match &self.matcher {
            Matcher::Exact(exact) => (exact == path).then(Params::new),
            Matcher::Template(re) => {
                let caps = re.captures(path)?;
                let mut params = Params::new();
                for (i, key) in self.keys.iter().enumerate() {
                    if let Some(m) = caps.get(i + 1) {
                        params.insert(key.as_str(), m.as_str());
                    }
                }
                Some(params)
            }
            Matcher::Raw(re) => {
                let caps = re.captures(path)?;
                let mut params = Params::new();
                for key in &self.keys {
                    if let Some(m) = caps.name(key) {
                        params.insert(key.as_str(), m.as_str());
                    }
                }
                Some(params)
            }
        }
    }
}

/// Translate a template into an anchored expression and its parameter keys.
///
/// Each segment is translated independently, so any mix of optional
/// parameters, suffixed parameters and a wildcard composes.
pub fn template_to_regex(pattern: &str) -> Result<(String, Vec<String>), RegistrationError> {
    let mut expr = String::with_capacity(pattern.len() + 16);
    expr.push('^');
    let mut keys = Vec::with_capacity(pattern.matches([':', '*']).count());

    let body = pattern.strip_prefix('/').unwrap_or(pattern);
    let segments: Vec<&str> = body.split('/').collect();
    let last = segments.len().saturating_sub(1);

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() && i == last {
            // trailing slash; covered by the `/?` tail
            continue;
        }

        if *segment == "*" {
            keys.push(WILDCARD_KEY.to_string());
            expr.push_str("/(.*)");
        } else if let Some(param) = segment.strip_prefix(':') {
            let name_end = param.find(['?', '.']).unwrap_or(param.len());
            let (name, rest) = param.split_at(name_end);
            let (optional, suffix) = match rest.strip_prefix('?') {
                Some(suffix) => (true, suffix),
                None => (false, rest),
            };

            if name.is_empty() {
                return Err(RegistrationError::invalid_pattern(
                    pattern,
                    "empty parameter name",
                ));
            }
            if !suffix.is_empty() && !suffix.starts_with('.') {
                return Err(RegistrationError::invalid_pattern(
                    pattern,
                    format!("unexpected {suffix:?} after parameter {name:?}"),
                ));
            }

            keys.push(name.to_string());
            match (optional, suffix.is_empty()) {
                (true, true) => expr.push_str("(?:/([^/]+?))?"),
                (true, false) => {
                    expr.push_str("/([^/]+?)?");
                    expr.push_str(&regex::escape(suffix));
                }
                (false, _) => {
                    expr.push_str("/([^/]+?)");
                    expr.push_str(&regex::escape(suffix));
                }
            }
        } else {
            expr.push('/');
            expr.push_str(&regex::escape(segment));
        }
    }

    expr.push_str("/?$");
    Ok((expr, keys))
}
