//! E-mail delivery behind [`NotificationDispatcher`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use internship_core::domain::{Notification, NotificationDispatcher, NotificationError};
use serde::Serialize;
use tracing::info;

use crate::config::{NotificationConfig, NotificationProvider};

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Default)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        info!(
            recipient = notification.recipient.as_str(),
            kind = notification.kind.as_str(),
            subject = %notification.subject,
            "notification (not sent)"
        );
        Ok(())
    }
}

/// Transactional e-mail through the Resend HTTP API.
pub struct ResendDispatcher {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    reply_to: Option<String>,
}

#[derive(Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl ResendDispatcher {
    pub fn new(config: &NotificationConfig, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client for notifications")?;

        Ok(Self {
            client,
            api_url: config.resend_api_url.clone(),
            api_key,
            from: config.from.clone(),
            reply_to: config.reply_to.clone(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for ResendDispatcher {
    fn name(&self) -> &str {
        "resend"
    }

    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        let email = ResendEmail {
            from: &self.from,
            to: [notification.recipient.as_str()],
            subject: &notification.subject,
            text: &notification.body,
            reply_to: self.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    NotificationError::Timeout
                } else {
                    NotificationError::Unavailable(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected(format!("{status}: {body}")));
        }

        info!(
            recipient = notification.recipient.as_str(),
            kind = notification.kind.as_str(),
            "notification sent"
        );
        Ok(())
    }
}

/// Picks the dispatcher named by `notifications.provider`.
pub fn dispatcher_from_config(
    config: &NotificationConfig,
) -> anyhow::Result<Arc<dyn NotificationDispatcher>> {
    match config.provider {
        NotificationProvider::Log => Ok(Arc::new(LogDispatcher)),
        NotificationProvider::Resend => {
            let api_key = config
                .resend_api_key
                .clone()
                .ok_or_else(|| anyhow!("RESEND_API_KEY is required for the resend provider"))?;
            Ok(Arc::new(ResendDispatcher::new(config, api_key)?))
        }
    }
}
