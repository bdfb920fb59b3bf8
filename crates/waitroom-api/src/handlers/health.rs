//! Health probes for service monitoring.
//!
//! `/health` verifies store connectivity for readiness; `/live` only says
//! the process is responding. Neither reads signup records.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::server::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status.
    pub status: HealthStatus,
    /// Timestamp when the check was performed.
    pub timestamp: DateTime<Utc>,
    /// Individual component checks.
    pub checks: HealthChecks,
    /// Service version information.
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational.
    Healthy,
    /// Critical systems failing.
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Signup store connectivity.
    pub store: ComponentHealth,
}

/// Health status for a single component.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status.
    pub status: ComponentStatus,
    /// Optional error message if unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Check duration in milliseconds.
    pub response_time_ms: u64,
}

/// Component-level health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy.
    Up,
    /// Component is experiencing issues.
    Down,
}

/// Readiness probe with a store connectivity check.
///
/// Called frequently by orchestration systems, so the probe is a single
/// lightweight query.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let timestamp = DateTime::<Utc>::from(state.clock.now_system());
    let start = state.clock.now();

    let check_result = state.store.health_check().await;
    let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    let store = match check_result {
        Ok(()) => {
            debug!("store health check passed");
            ComponentHealth { status: ComponentStatus::Up, message: None, response_time_ms }
        },
        Err(e) => {
            error!(error = %e, "store health check failed");
            ComponentHealth {
                status: ComponentStatus::Down,
                message: Some(format!("store connection failed: {e}")),
                response_time_ms,
            }
        },
    };

    let (status, status_code) = match store.status {
        ComponentStatus::Up => (HealthStatus::Healthy, StatusCode::OK),
        ComponentStatus::Down => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        timestamp,
        checks: HealthChecks { store },
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response)).into_response()
}

/// Liveness probe.
///
/// Minimal check that does not touch external dependencies.
#[instrument(name = "liveness_check", skip(state))]
pub async fn liveness_check(State(state): State<AppState>) -> Response {
    let response = serde_json::json!({
        "status": "alive",
        "timestamp": DateTime::<Utc>::from(state.clock.now_system()),
        "service": "waitroom-api",
    });

    (StatusCode::OK, Json(response)).into_response()
}
