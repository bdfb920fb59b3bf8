//! Waitlist signup handler.
//!
//! Accepts form-encoded or JSON submissions, validates and normalizes the
//! email, persists one record, and fires the operator notification without
//! letting its outcome touch the response.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use waitroom_core::{EmailAddress, Signup};
use waitroom_notify::dispatch_signup_notification;

use crate::server::AppState;

/// Request body for a signup submission.
///
/// A well-formed body without an `email` field yields the empty string,
/// which then fails email validation rather than body parsing.
#[derive(Debug, Deserialize)]
struct SignupRequest {
    #[serde(default)]
    email: String,
}

/// JSON envelope returned by every signup-path response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    /// Whether the signup was accepted.
    pub success: bool,
    /// Error description when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable acknowledgment when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SignupResponse {
    /// Envelope for an accepted signup.
    pub fn accepted(message: &str) -> Self {
        Self { success: true, error: None, message: Some(message.to_string()) }
    }

    /// Envelope for a rejected request.
    pub fn rejected(error: &str) -> Self {
        Self { success: false, error: Some(error.to_string()), message: None }
    }
}

/// Handles `POST /`.
///
/// The store write is awaited; a failure there fails the request. The
/// notification is dispatched on a detached task after the write succeeds
/// and can neither delay nor fail the response.
#[instrument(name = "signup", skip(state, headers, body), fields(content_length = body.len()))]
pub async fn signup(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let raw_email = match parse_signup_request(&headers, &body) {
        Ok(request) => request.email,
        Err(e) => {
            debug!(error = %e, "unparseable signup body");
            return reject(StatusCode::BAD_REQUEST, "Invalid request");
        },
    };

    let email = match EmailAddress::parse(&raw_email) {
        Ok(email) => email,
        Err(e) => {
            debug!(error = %e, "rejected signup email");
            return reject(StatusCode::BAD_REQUEST, "Invalid email");
        },
    };

    let record = Signup::new(&email, state.clock.epoch_millis(), &state.source);
    let key = record.storage_key();

    let value = match serde_json::to_value(&record) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "failed to encode signup record");
            return reject(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        },
    };

    if let Err(e) = state.store.put(&key, value).await {
        error!(error = %e, key = %key, "failed to persist signup");
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
    }

    info!(email = %email, key = %key, "waitlist signup recorded");

    dispatch_signup_notification(state.notifier.clone(), email.into_inner(), state.source.clone());

    (StatusCode::OK, Json(SignupResponse::accepted("You're on the list!"))).into_response()
}

/// Handles CORS preflight for the signup endpoint.
///
/// The CORS headers themselves are stamped by the middleware layer, so this
/// only produces the empty 204.
pub async fn preflight() -> Response {
    (StatusCode::NO_CONTENT, [(header::CONTENT_TYPE, "text/plain")]).into_response()
}

/// Fallback for any method other than `POST`/`OPTIONS` on the signup route.
pub async fn method_not_allowed() -> Response {
    reject(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Parses the request body according to its declared content type.
///
/// Form-encoded bodies are accepted when the `Content-Type` says so;
/// everything else is treated as JSON, matching the public contract.
fn parse_signup_request(headers: &HeaderMap, body: &[u8]) -> Result<SignupRequest, String> {
    let content_type =
        headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or("");

    if content_type.contains("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(body).map_err(|e| e.to_string())
    } else {
        serde_json::from_slice(body).map_err(|e| e.to_string())
    }
}

fn reject(status: StatusCode, error: &str) -> Response {
    (status, Json(SignupResponse::rejected(error))).into_response()
}
