//! Request and response types, and response conversion.

use bytes::Bytes;
use http::{StatusCode, header::HeaderValue};

/// Response body. `None` is a null body, as produced for HEAD requests and
/// bodiless status codes.
pub type Body = Option<Bytes>;

/// The request type consumed by the dispatcher. Bodies are passed through
/// untouched; the dispatcher never parses them.
pub type Request = http::Request<Bytes>;

/// The response type produced by the dispatcher.
pub type Response = http::Response<Body>;

/// Trait for converting a handler's return value into a [`Response`].
///
/// # Default Implementations
///
/// - `Response` → As is
/// - `&'static str` / `String` → `200`, `text/plain; charset=utf-8`
/// - `Bytes` / `Vec<u8>` → `200`, no content type
/// - `StatusCode` → That status with an empty body
/// - `(StatusCode, T)` → `T`'s response with the status replaced
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be converted into a `Response`",
    label = "missing `IntoResponse` implementation",
    note = "IntoResponse must implement the `into_response` method."
)]
pub trait IntoResponse {
    /// Convert the value into a response.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        text(Bytes::from_static(self.as_bytes()))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        text(Bytes::from(self))
    }
}

impl IntoResponse for Bytes {
    fn into_response(self) -> Response {
        Response::new(Some(self))
    }
}

impl IntoResponse for Vec<u8> {
    fn into_response(self) -> Response {
        Response::new(Some(Bytes::from(self)))
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        let mut res = Response::new(Some(Bytes::new()));
        *res.status_mut() = self;
        res
    }
}

impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> Response {
        let mut res = self.1.into_response();
        *res.status_mut() = self.0;
        res
    }
}

fn text(body: Bytes) -> Response {
    let mut res = Response::new(Some(body));
    res.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}
