//! Best-effort push notifications for waitlist signups.
//!
//! Wraps an ntfy-style topic endpoint: signups are announced with an HTTP
//! POST carrying a title, tags, and priority headers plus a plain-text body.
//! Delivery is strictly best-effort; the dispatch helper detaches the call
//! from the caller so notification latency or failure never reaches the
//! user-facing response.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::error;

pub use client::{Notifier, NotifyConfig};
pub use error::{NotifyError, Result};

/// Fires the signup notification on a detached task.
///
/// The returned handle is safe to drop: the runtime keeps the task alive
/// after the HTTP response has been sent. Any failure is logged at error
/// level and otherwise discarded — never retried, never surfaced to the
/// caller.
pub fn dispatch_signup_notification(
    notifier: Arc<Notifier>,
    email: String,
    source: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify_signup(&email, &source).await {
            error!(error = %e, email = %email, "signup notification failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    use super::*;

    fn notifier_for(server: &MockServer) -> Arc<Notifier> {
        Arc::new(
            Notifier::new(NotifyConfig {
                base_url: server.uri(),
                topic: "test-topic".to_string(),
                timeout: Duration::from_secs(5),
                user_agent: "waitroom-tests".to_string(),
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn dispatch_delivers_exactly_one_notification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        let handle =
            dispatch_signup_notification(notifier, "ada@example.com".into(), "waitroom.dev".into());

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_swallows_delivery_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        let handle =
            dispatch_signup_notification(notifier, "ada@example.com".into(), "waitroom.dev".into());

        // The task completes without panicking even though delivery failed.
        handle.await.unwrap();
    }
}
