//! HTTP client for ntfy-style push notifications.
//!
//! One pooled client per process, configurable timeout, and error
//! categorization so the dispatch path can log what went wrong. The
//! notification payload is deliberately simple: a handful of metadata
//! headers and a plain-text body naming the address that signed up.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NotifyError, Result};

/// Configuration for the notification client.
///
/// The topic is a process-wide constant: loaded once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Base URL of the notification service.
    pub base_url: String,
    /// Topic the operator subscribes to.
    pub topic: String,
    /// Timeout for the notification request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ntfy.sh".to_string(),
            topic: "waitroom-waitlist".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "Waitroom/1.0".to_string(),
        }
    }
}

impl NotifyConfig {
    /// Returns the full topic URL notifications are posted to.
    pub fn topic_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.topic)
    }
}

/// HTTP client for delivering signup notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    config: NotifyConfig,
}

impl Notifier {
    /// Creates a new notifier with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: NotifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NotifyError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a notifier with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(NotifyConfig::default())
    }

    /// Posts the signup notification to the configured topic.
    ///
    /// The response body is never consumed; only the status matters, and
    /// only for the diagnostic log. Callers on the request path must go
    /// through [`dispatch_signup_notification`](crate::dispatch_signup_notification)
    /// instead of awaiting this directly.
    ///
    /// # Errors
    ///
    /// Returns `Timeout`, `Network`, or `Status` depending on how the
    /// attempt failed.
    pub async fn notify_signup(&self, email: &str, source: &str) -> Result<()> {
        let url = self.config.topic_url();
        debug!(url = %url, "sending signup notification");

        let response = self
            .client
            .post(&url)
            .header("Title", "New waitlist signup")
            .header("Tags", "email,tada")
            .header("Priority", "default")
            .header("Content-Type", "text/plain")
            .body(format!("\u{1F4E7} {email} just joined the {source} waitlist!"))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout { timeout_secs: self.config.timeout.as_secs() }
                } else {
                    NotifyError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status { status: status.as_u16() });
        }

        debug!(status = status.as_u16(), "signup notification delivered");
        Ok(())
    }
}
