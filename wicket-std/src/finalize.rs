//! Response finalization.
//!
//! Normalizes an outgoing response for HEAD requests and for status codes
//! that cannot carry a body.

use http::{HeaderValue, StatusCode, header::CONTENT_LENGTH};
use wicket_core::Response;

/// Returns `true` for statuses whose responses never carry a body:
/// `101`, `204`, `205` and `304`.
pub fn is_bodiless(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::SWITCHING_PROTOCOLS
            | StatusCode::NO_CONTENT
            | StatusCode::RESET_CONTENT
            | StatusCode::NOT_MODIFIED
    )
}

/// Finalize a response.
///
/// - Bodiless status or HEAD request: the body is dropped.
/// - `205`: `Content-Length` is forced to `0`.
/// - Other bodiless statuses on a non-HEAD request: `Content-Length` is removed.
/// - HEAD on a regular status keeps every header, including a
///   `Content-Length` describing the GET body.
///
/// A regular response to a non-HEAD request is returned untouched.
pub fn finalize(mut res: Response, is_head: bool) -> Response {
    let status = res.status();
    let bodiless = is_bodiless(status);

    if !bodiless && !is_head {
        return res;
    }

    *res.body_mut() = None;

    if status == StatusCode::RESET_CONTENT {
        res.headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    } else if bodiless && !is_head {
        res.headers_mut().remove(CONTENT_LENGTH);
    }

    res
}
