//! Response hardening headers for the JSON API.

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;

const API_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
];

/// Adds the API security headers to every response. Responses that carry a
/// session cookie are also marked `no-store`.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let sets_cookie = response.headers().contains_key(http::header::SET_COOKIE);
    let headers = response.headers_mut();

    for (name, value) in API_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if sets_cookie {
        headers.insert(http::header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}
