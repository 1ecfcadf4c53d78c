#![allow(dead_code)]

use http::HeaderValue;
use wicket::{BoxError, Context, Handler, Outcome, Request, Response};

// ============================================================================
// Response helpers
// ============================================================================

pub fn body_text(res: &Response) -> &str {
    res.body()
        .as_deref()
        .map(|b| std::str::from_utf8(b).unwrap())
        .unwrap_or("")
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Responds with the captured params as `k=v` pairs, sorted by key.
pub struct EchoParams;

impl Handler for EchoParams {
    async fn handle(&self, _req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        let mut pairs: Vec<String> = ctx
            .params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        pairs.sort();
        Ok(Outcome::respond(pairs.join("&")))
    }
}

/// Responds with the (possibly rewritten) path seen by the handler.
pub struct EchoPath;

impl Handler for EchoPath {
    async fn handle(&self, _req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        Ok(Outcome::respond(ctx.path().to_string()))
    }
}

/// Registers a deferral that appends `value` to the `x-trail` header.
pub struct Trail(pub &'static str);

impl Handler for Trail {
    async fn handle(&self, _req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
        let value = self.0;
        ctx.defer(move |res| {
            res.headers_mut()
                .append("x-trail", HeaderValue::from_static(value));
        });
        Ok(Outcome::Continue)
    }
}

pub fn trail(res: &Response) -> Vec<&str> {
    res.headers()
        .get_all("x-trail")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect()
}
