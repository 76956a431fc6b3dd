//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Adds security headers to every API response.
///
/// - **Cache-Control: no-store**: challenges and session tokens must never be
///   served from a cache.
/// - **Referrer-Policy: no-referrer**: the `address` query of
///   `/login-challenge` stays out of `Referer` headers sent onward.
/// - **X-Content-Type-Options: nosniff**: bodies are JSON only and are never
///   reinterpreted as script or HTML.
/// - **X-Frame-Options: DENY**: nothing here is meant to be framed.
///
/// # Usage
///
/// ```rust,no_run
/// use axum::Router;
/// use axum::middleware;
/// use walletgate::middleware::security_headers;
///
/// let app: Router = Router::new()
///     .layer(middleware::from_fn(security_headers));
/// ```
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));

    response
}
