//! Request inspection helpers.
//!
//! # Responsibilities
//! - Assign each request an ID (propagated `x-request-id` or UUID v4)
//! - Percent-decode the request path before it is routed
//! - Decode query strings and url-encoded form bodies
//!
//! # Design Decisions
//! - Request ID resolved as early as possible so every log line carries it
//! - First occurrence of a repeated key wins

use std::borrow::Cow;

use axum::http::{header, HeaderMap};
use percent_encoding::percent_decode_str;
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Reuse the client's request ID when it sent a usable one.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Percent-decode a request path.
///
/// Escapes that do not decode to UTF-8 are replaced lossily.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    let decoded = percent_decode_str(raw);
    match decoded.clone().decode_utf8() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(path = %raw, error = %e, "Request path is not valid UTF-8 once decoded");
            decoded.decode_utf8_lossy()
        }
    }
}

/// Look up `key` in a url-encoded `a=1&b=2` string.
pub fn form_value(encoded: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Returns true if the request body is a url-encoded form.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with(FORM_URLENCODED))
        .unwrap_or(false)
}
