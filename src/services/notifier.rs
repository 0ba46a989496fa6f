use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EventError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Destructive,
}

/// User-facing message produced by the presentation layer when a repository
/// operation settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Success,
        }
    }

    pub fn failure(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Destructive,
        }
    }

    /// Maps a repository error to the message shown to the user.
    pub fn for_error(context: &str, err: &EventError) -> Self {
        let description = match err {
            EventError::BackendUnavailable => {
                "The event backend is unreachable. Please try again later.".to_string()
            }
            EventError::AuthRequired => "You must be signed in to do that.".to_string(),
            EventError::NotFound(_) => "That event no longer exists.".to_string(),
            EventError::AtCapacity(_) => "This event is at full capacity.".to_string(),
            EventError::Validation(reason) => reason.clone(),
            EventError::Backend(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
        };

        Self::failure(context, &description)
    }
}

/// Fire-and-forget notification sink. When a sink URL is configured the
/// notification is POSTed as JSON from a detached task; either way it is
/// logged. Delivery failures are logged and dropped, never retried.
#[derive(Clone)]
pub struct Notifier {
    client: Client,
    sink_url: Option<String>,
}

impl Notifier {
    pub fn new(sink_url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            sink_url,
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("NOTIFY_WEBHOOK_URL").ok())
    }

    pub fn publish(&self, notification: Notification) {
        info!(
            "Notification [{:?}] {}: {}",
            notification.severity, notification.title, notification.description
        );

        let Some(url) = self.sink_url.clone() else {
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&notification).send().await {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    warn!(
                        "Notification sink returned status {}: {}",
                        response.status(),
                        url
                    );
                }
                Err(err) => {
                    warn!("Failed to deliver notification to {}: {}", url, err);
                }
            }
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(None)
    }
}
