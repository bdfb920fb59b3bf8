//! Tests for the CORS contract and method handling.
//!
//! The endpoint is public and cross-origin-callable: every response has to
//! carry the permissive header set, and preflight is a bare 204.

use axum::{
    http::{HeaderMap, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;
use waitroom_api::{create_router, AppState};
use waitroom_testing::{bare_request, json_signup, TestEnv, TEST_SOURCE};

fn router(env: &TestEnv) -> Router {
    create_router(AppState {
        store: env.store(),
        notifier: env.notifier(),
        clock: env.clock(),
        source: TEST_SOURCE.to_string(),
    })
}

fn assert_cors_headers(headers: &HeaderMap) {
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("access-control-allow-methods").unwrap(), "POST, OPTIONS");
    assert_eq!(headers.get("access-control-allow-headers").unwrap(), "Content-Type");
}

async fn response_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&body).expect("parse response json")
}

#[tokio::test]
async fn preflight_returns_204_with_empty_body_and_cors_headers() {
    let env = TestEnv::new().await;

    let response = router(&env).oneshot(bare_request("OPTIONS")).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors_headers(response.headers());

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    assert!(body.is_empty());
}

#[tokio::test]
async fn successful_signup_response_carries_cors_headers() {
    let env = TestEnv::new().await;

    let response = router(&env)
        .oneshot(json_signup(r#"{"email":"ada@example.com"}"#))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(response.headers());
}

#[tokio::test]
async fn validation_error_response_carries_cors_headers() {
    let env = TestEnv::new().await;

    let response = router(&env)
        .oneshot(json_signup(r#"{"email":"not-an-email"}"#))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors_headers(response.headers());
}

#[tokio::test]
async fn other_methods_get_405_with_json_error_and_cors_headers() {
    let env = TestEnv::new().await;

    for method in ["GET", "DELETE", "PUT", "PATCH"] {
        let response =
            router(&env).oneshot(bare_request(method)).await.expect("execute request");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "method {method}");
        assert_cors_headers(response.headers());

        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Method not allowed");
    }
}
