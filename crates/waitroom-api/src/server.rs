//! HTTP server configuration and request routing.
//!
//! Provides Axum server setup with the middleware stack and graceful
//! shutdown. Requests flow through middleware in order:
//! 1. CORS header stamping (every response, including errors)
//! 2. Request ID generation
//! 3. Request/response logging
//! 4. Timeout enforcement (30s default)
//! 5. Handler execution

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;
use waitroom_core::{Clock, SignupStore};
use waitroom_notify::Notifier;

use crate::{handlers, middleware::cors::cors_headers};

/// Shared application state available to all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Write-only signup store.
    pub store: Arc<dyn SignupStore>,
    /// Outbound notification client.
    pub notifier: Arc<Notifier>,
    /// Time source for signup timestamps.
    pub clock: Arc<dyn Clock>,
    /// Source tag recorded with every signup.
    pub source: String,
}

/// Creates the Axum router with all routes and middleware.
///
/// The signup route accepts `POST` and `OPTIONS`; every other method lands
/// in the method fallback, which answers 405 with the JSON error envelope
/// instead of axum's bare status.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use waitroom_api::{create_router, AppState};
/// use waitroom_core::{storage::mock::MemorySignupStore, RealClock};
/// use waitroom_notify::Notifier;
///
/// let state = AppState {
///     store: Arc::new(MemorySignupStore::new()),
///     notifier: Arc::new(Notifier::with_defaults().unwrap()),
///     clock: Arc::new(RealClock::new()),
///     source: "waitroom.dev".to_string(),
/// };
/// let app = create_router(state);
/// // Serve the app...
/// ```
pub fn create_router(state: AppState) -> Router {
    let signup_routes = Router::new().route(
        "/",
        post(handlers::signup)
            .options(handlers::preflight)
            .fallback(handlers::method_not_allowed),
    );

    let probe_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check));

    Router::new()
        .merge(signup_routes)
        .merge(probe_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .layer(middleware::from_fn(cors_headers))
        .with_state(state)
}

/// Middleware to inject a request ID into all responses.
///
/// Adds an X-Request-Id header for tracing requests across services.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Binds to the specified address and serves requests until a shutdown
/// signal is received. Detached notification tasks keep running on the
/// runtime after the listener stops accepting connections.
///
/// # Errors
///
/// Returns `std::io::Error` if the port is already in use or the network
/// interface is unavailable.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight requests to complete");
}
