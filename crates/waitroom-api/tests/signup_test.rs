//! Integration tests for the signup endpoint.
//!
//! Drives the full router with `tower::ServiceExt::oneshot` against the
//! in-memory store and a wiremock notification receiver: request parsing,
//! validation, persistence, and the decoupled notification path.

use std::time::Duration;

use axum::{http::StatusCode, response::Response, Router};
use tower::ServiceExt;
use waitroom_api::{create_router, AppState};
use waitroom_testing::{
    form_signup, json_signup, TestEnv, TEST_EPOCH_MS, TEST_SOURCE, TEST_TOPIC,
};

fn router(env: &TestEnv) -> Router {
    create_router(AppState {
        store: env.store(),
        notifier: env.notifier(),
        clock: env.clock(),
        source: TEST_SOURCE.to_string(),
    })
}

async fn response_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&body).expect("parse response json")
}

#[tokio::test]
async fn json_signup_succeeds_and_persists_one_record() {
    let env = TestEnv::new().await;

    let response = router(&env)
        .oneshot(json_signup(r#"{"email":"ada@example.com"}"#))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "You're on the list!");

    let entries = env.store().entries().await;
    assert_eq!(entries.len(), 1);

    let key = format!("waitlist:{TEST_EPOCH_MS}:ada@example.com");
    let record = entries.get(&key).expect("record stored under derived key");
    assert_eq!(record["email"], "ada@example.com");
    assert_eq!(record["ts"], TEST_EPOCH_MS);
    assert_eq!(record["source"], TEST_SOURCE);
}

#[tokio::test]
async fn form_signup_succeeds_and_persists_one_record() {
    let env = TestEnv::new().await;

    let response = router(&env)
        .oneshot(form_signup("email=ada%40example.com"))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);

    assert_eq!(env.store().entry_count().await, 1);
}

#[tokio::test]
async fn invalid_emails_are_rejected() {
    let env = TestEnv::new().await;

    for email in ["not-an-email", "", "a@b", "a @b.c", "a@b c.d"] {
        let body = serde_json::json!({ "email": email }).to_string();
        let response = router(&env).oneshot(json_signup(&body)).await.expect("execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "should reject {email:?}");
        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid email");
    }

    assert_eq!(env.store().entry_count().await, 0);
}

#[tokio::test]
async fn missing_email_field_is_rejected_as_invalid_email() {
    let env = TestEnv::new().await;

    let response = router(&env).oneshot(json_signup("{}")).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Invalid email");
}

#[tokio::test]
async fn unparseable_json_body_is_rejected_as_invalid_request() {
    let env = TestEnv::new().await;

    let response =
        router(&env).oneshot(json_signup(r#"{"email":"#)).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid request");
}

#[tokio::test]
async fn normalization_produces_identical_stored_emails() {
    let env = TestEnv::new().await;

    let first = router(&env)
        .oneshot(json_signup(r#"{"email":"  Foo@Bar.COM  "}"#))
        .await
        .expect("execute first request");
    assert_eq!(first.status(), StatusCode::OK);

    // A later instant, so the second record gets its own key.
    env.clock().advance(Duration::from_millis(1));

    let second = router(&env)
        .oneshot(json_signup(r#"{"email":"foo@bar.com"}"#))
        .await
        .expect("execute second request");
    assert_eq!(second.status(), StatusCode::OK);

    let entries = env.store().entries().await;
    assert_eq!(entries.len(), 2);

    let emails: Vec<_> = entries.values().map(|record| record["email"].clone()).collect();
    assert_eq!(emails[0], "foo@bar.com");
    assert_eq!(emails[0], emails[1]);
}

#[tokio::test]
async fn same_millisecond_duplicate_submission_fails_the_second_write() {
    let env = TestEnv::new().await;
    let body = r#"{"email":"ada@example.com"}"#;

    let first = router(&env).oneshot(json_signup(body)).await.expect("execute first request");
    assert_eq!(first.status(), StatusCode::OK);

    // Clock not advanced: same key, write-once store rejects it.
    let second = router(&env).oneshot(json_signup(body)).await.expect("execute second request");
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(env.store().entry_count().await, 1);
}

#[tokio::test]
async fn successful_signup_triggers_exactly_one_notification() {
    let env = TestEnv::new().await;

    let response = router(&env)
        .oneshot(json_signup(r#"{"email":"ada@example.com"}"#))
        .await
        .expect("execute request");
    assert_eq!(response.status(), StatusCode::OK);

    assert!(env.wait_for_notifications(1).await, "notification never arrived");
    assert_eq!(env.notification_count().await, 1);

    let requests = env.ntfy().received_requests().await.expect("recorded requests");
    let notification = &requests[0];
    assert_eq!(notification.url.path(), format!("/{TEST_TOPIC}"));

    let body = String::from_utf8(notification.body.clone()).expect("utf-8 body");
    assert!(body.contains("ada@example.com"));
    assert!(body.contains(TEST_SOURCE));

    let title = notification.headers.get("Title").expect("Title header");
    assert_eq!(title.to_str().unwrap(), "New waitlist signup");
}

#[tokio::test]
async fn failing_notification_endpoint_does_not_affect_response() {
    let env = TestEnv::with_notify_status(500).await;

    let response = router(&env)
        .oneshot(json_signup(r#"{"email":"ada@example.com"}"#))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);

    // The attempt is still made, its failure just swallowed.
    assert!(env.wait_for_notifications(1).await, "notification attempt never arrived");
    assert_eq!(env.store().entry_count().await, 1);
}

#[tokio::test]
async fn store_write_failure_fails_the_request() {
    let env = TestEnv::new().await;
    env.store().inject_put_error("injected write failure").await;

    let response = router(&env)
        .oneshot(json_signup(r#"{"email":"ada@example.com"}"#))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);

    // No record, and no notification for a signup that was never persisted.
    assert_eq!(env.store().entry_count().await, 0);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(env.notification_count().await, 0);
}
