//! Client for the external title enhancement webhook.
//!
//! The webhook receives `{"title", "priority"}` and answers with JSON holding
//! an `enhanced_title` (or, failing that, a `title`). Callers treat every
//! failure as recoverable and fall back to the title they sent.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskflow_core::Priority;

use crate::config::Config;

/// Error type for enhancement webhook calls.
#[derive(Debug, thiserror::Error)]
pub enum EnhancementError {
    /// Connection, timeout or body decoding failure.
    #[error("Enhancement request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The webhook answered with a non-success status.
    #[error("Enhancement webhook returned status {0}")]
    Status(StatusCode),
    /// The response carried neither a usable `enhanced_title` nor `title`.
    #[error("Enhancement response did not contain a title")]
    MissingTitle,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleEnhancer: Send + Sync {
    /// Returns a rewritten title for a task about to be created.
    async fn enhance(&self, title: &str, priority: Priority) -> Result<String, EnhancementError>;
}

#[derive(Debug, Serialize)]
struct EnhancementRequest<'a> {
    title: &'a str,
    priority: Priority,
}

#[derive(Debug, Deserialize)]
struct EnhancementResponse {
    #[serde(default)]
    enhanced_title: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl EnhancementResponse {
    fn into_title(self) -> Option<String> {
        [self.enhanced_title, self.title]
            .into_iter()
            .flatten()
            .map(|title| title.trim().to_string())
            .find(|title| !title.is_empty())
    }
}

/// [`TitleEnhancer`] that POSTs JSON to a fixed webhook URL.
#[derive(Clone, Debug)]
pub struct WebhookEnhancer {
    client: reqwest::Client,
    url: String,
}

impl WebhookEnhancer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EnhancementError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Builds an enhancer when the config names a webhook URL.
    pub fn from_config(config: &Config) -> Result<Option<Self>, EnhancementError> {
        config
            .enhancement_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                Self::new(
                    url.trim(),
                    Duration::from_secs(config.enhancement_timeout_secs),
                )
            })
            .transpose()
    }
}

#[async_trait]
impl TitleEnhancer for WebhookEnhancer {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn enhance(&self, title: &str, priority: Priority) -> Result<String, EnhancementError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EnhancementRequest { title, priority })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnhancementError::Status(status));
        }

        let body: EnhancementResponse = response.json().await?;
        let enhanced = body.into_title().ok_or(EnhancementError::MissingTitle)?;
        tracing::info!("Enhanced task title '{}' to '{}'", title, enhanced);
        Ok(enhanced)
    }
}
