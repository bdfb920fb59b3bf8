//! Test environment for exercising the waitlist service without external
//! infrastructure.
//!
//! Bundles the in-memory store, a pinned test clock, and a wiremock-backed
//! notification receiver. Tests assemble the router from these parts and
//! drive it with the request builders below, so no Postgres instance or
//! real ntfy topic is ever needed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::{
    sync::Arc,
    time::{Duration, UNIX_EPOCH},
};

use axum::{body::Body, http::Request};
use waitroom_core::{storage::mock::MemorySignupStore, TestClock};
use waitroom_notify::{Notifier, NotifyConfig};
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

/// Topic every test environment posts notifications to.
pub const TEST_TOPIC: &str = "waitroom-test";

/// Source tag used by every test environment.
pub const TEST_SOURCE: &str = "waitroom.test";

/// Epoch milliseconds the test clock starts at (2025-01-01T00:00:00Z).
pub const TEST_EPOCH_MS: i64 = 1_735_689_600_000;

/// Self-contained test environment.
///
/// The notification receiver records every request it sees; because
/// dispatch is detached by design, assertions on notification counts go
/// through the bounded poll in [`TestEnv::wait_for_notifications`].
pub struct TestEnv {
    store: Arc<MemorySignupStore>,
    clock: Arc<TestClock>,
    notifier: Arc<Notifier>,
    ntfy: MockServer,
}

impl TestEnv {
    /// Environment whose notification receiver accepts every POST.
    pub async fn new() -> Self {
        Self::with_notify_status(200).await
    }

    /// Environment whose notification receiver answers every POST with
    /// `status`.
    pub async fn with_notify_status(status: u16) -> Self {
        let ntfy = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(status)).mount(&ntfy).await;

        let clock = Arc::new(TestClock::with_start_time(
            UNIX_EPOCH + Duration::from_millis(TEST_EPOCH_MS.unsigned_abs()),
        ));

        let notifier = Notifier::new(NotifyConfig {
            base_url: ntfy.uri(),
            topic: TEST_TOPIC.to_string(),
            timeout: Duration::from_secs(5),
            user_agent: "waitroom-tests".to_string(),
        })
        .expect("build test notifier");

        Self {
            store: Arc::new(MemorySignupStore::new()),
            clock,
            notifier: Arc::new(notifier),
            ntfy,
        }
    }

    /// Returns the in-memory store.
    pub fn store(&self) -> Arc<MemorySignupStore> {
        self.store.clone()
    }

    /// Returns the pinned test clock.
    pub fn clock(&self) -> Arc<TestClock> {
        self.clock.clone()
    }

    /// Returns the notifier pointed at the mock receiver.
    pub fn notifier(&self) -> Arc<Notifier> {
        self.notifier.clone()
    }

    /// Returns the mock notification receiver.
    pub fn ntfy(&self) -> &MockServer {
        &self.ntfy
    }

    /// Number of notification POSTs the receiver has seen so far.
    pub async fn notification_count(&self) -> usize {
        self.ntfy.received_requests().await.map_or(0, |requests| requests.len())
    }

    /// Waits until the receiver has seen at least `expected` notifications.
    ///
    /// Bounded poll (~1s); returns whether the count was reached. Needed
    /// because dispatch runs on a detached task the response never joins.
    pub async fn wait_for_notifications(&self, expected: usize) -> bool {
        for _ in 0..100 {
            if self.notification_count().await >= expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

/// Builds a JSON signup request for the router.
pub fn json_signup(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build json request")
}

/// Builds a form-encoded signup request for the router.
pub fn form_signup(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("build form request")
}

/// Builds an empty-bodied request with the given method against `/`.
pub fn bare_request(http_method: &str) -> Request<Body> {
    Request::builder().method(http_method).uri("/").body(Body::empty()).expect("build request")
}
