//! Backend API client for streak status and task completion.
//!
//! [`StreakBackend`] is the seam the coordinator talks through; production
//! code uses the reqwest-based [`HttpBackend`], tests script their own.

use serde_json::json;
use tracing::debug;

use super::status::{StreakStatus, TaskCompletion, TaskType};

/// Backend error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Non-success response; carries the backend's message verbatim.
    #[error("{0}")]
    Backend(String),
}

/// Fixed user-facing message for permission failures.
pub const PERMISSION_MESSAGE: &str = "You don't have permission to view streak data.";
/// Fixed user-facing message while the feature is switched off server-side.
pub const UNAVAILABLE_MESSAGE: &str =
    "Streak tracking is temporarily unavailable. Please try again later.";
/// Fixed user-facing message for connectivity failures.
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
/// Fallback user-facing message.
pub const GENERIC_MESSAGE: &str = "Something went wrong while loading your streak.";

/// Map a backend failure onto the message shown to the user.
///
/// Classification is by substring of the raw error text, matching what the
/// backend actually sends for each failure class.
pub fn user_message(err: &ApiError) -> &'static str {
    let raw = err.to_string();
    if raw.contains("Access denied") {
        PERMISSION_MESSAGE
    } else if raw.contains("temporarily unavailable") {
        UNAVAILABLE_MESSAGE
    } else if raw.contains("Network error") {
        NETWORK_MESSAGE
    } else {
        GENERIC_MESSAGE
    }
}

/// Interface to the streak backend.
pub trait StreakBackend {
    /// Fetch the user's current streak standing.
    fn fetch_status(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<StreakStatus, ApiError>>;

    /// Record a completed task and return the updated streak fields.
    fn complete_task(
        &self,
        user_id: &str,
        task_type: TaskType,
        content_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> impl std::future::Future<Output = Result<TaskCompletion, ApiError>>;
}

/// HTTP implementation of [`StreakBackend`].
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Extract the backend's `message` field from an error response body,
    /// falling back to the status line.
    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
            .and_then(|value| value["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| format!("Backend returned {status}"));
        ApiError::Backend(message)
    }
}

impl StreakBackend for HttpBackend {
    async fn fetch_status(&self, user_id: &str) -> Result<StreakStatus, ApiError> {
        let url = format!("{}/streaks/{}", self.base_url, user_id);
        debug!(%url, "fetching streak status");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn complete_task(
        &self,
        user_id: &str,
        task_type: TaskType,
        content_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<TaskCompletion, ApiError> {
        let url = format!("{}/streaks/{}/complete", self.base_url, user_id);
        let mut body = json!({
            "task_type": task_type,
            "content_id": content_id,
        });
        if let Some(metadata) = metadata {
            body["metadata"] = metadata;
        }
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response.json().await?)
    }
}
