//! CORS headers for the public signup endpoint.
//!
//! The endpoint is public, unauthenticated, and cross-origin-callable by
//! design: every response, including errors, carries the same permissive
//! header set. The contract pins the exact preflight status and header
//! values, so the headers are stamped here rather than configured through
//! tower-http's `CorsLayer`.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Stamps permissive CORS headers on every response.
pub async fn cors_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));

    response
}
