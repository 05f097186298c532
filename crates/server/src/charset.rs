//! Append `charset=utf-8` to text responses so Chinese content renders
//! correctly whatever the browser's default encoding is.

use axum::http::{header::CONTENT_TYPE, HeaderValue};
use axum::response::Response;

const UTF8_TYPES: [&str; 5] = [
    "text/html",
    "text/css",
    "text/plain",
    "text/javascript",
    "application/javascript",
];

/// The content type with a UTF-8 charset, or `None` when it needs no change.
pub fn with_utf8_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    if lower.contains("charset=") {
        return None;
    }
    let essence = lower.split(';').next().unwrap_or_default().trim();
    UTF8_TYPES
        .contains(&essence)
        .then(|| format!("{essence}; charset=utf-8"))
}

/// Response mapper for `axum::middleware::map_response`.
pub async fn utf8_charset(mut response: Response) -> Response {
    let fixed = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(with_utf8_charset);
    if let Some(value) = fixed.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}
