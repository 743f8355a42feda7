//! Telegram notifier with throttle-aware delivery

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::messages::{ApiErrorResponse, SendMessageForm};
use crate::common::clock::TokioSleeper;
use crate::common::errors::{ClientError, Result};
use crate::common::traits::{Notifier, Sleeper};
use crate::config::types::{AppSettings, TelegramConfig};

/// Wait applied when a 429 carries no retry hint, and the shortest wait allowed
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Sends plain text messages to one Telegram chat
pub struct TelegramNotifier {
    client: Client,
    /// `{api_url}/bot{token}/sendMessage`; holds the token, never logged
    endpoint: String,
    chat_id: String,
    /// Throttled retries allowed per message (0 = infinite)
    max_throttle_retries: u32,
    sleeper: Arc<dyn Sleeper>,
}

impl TelegramNotifier {
    /// Create a notifier with the default timeout and retry cap
    pub fn new(api_url: &str, token: &str, chat_id: &str) -> Result<Self> {
        Self::with_timeout(api_url, token, chat_id, Duration::from_secs(30))
    }

    /// Create a notifier with a custom request timeout
    pub fn with_timeout(
        api_url: &str,
        token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self> {
        if token.is_empty() {
            return Err(ClientError::Configuration("Bot token is empty".to_string()));
        }
        if chat_id.is_empty() {
            return Err(ClientError::Configuration("Chat ID is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token),
            chat_id: chat_id.to_string(),
            max_throttle_retries: 10,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Create a notifier from configuration
    pub fn from_config(config: &TelegramConfig, settings: &AppSettings) -> Result<Self> {
        Ok(Self::with_timeout(
            &config.api_url,
            &config.token,
            &config.chat_id,
            settings.request_timeout(),
        )?
        .with_max_throttle_retries(settings.max_throttle_retries))
    }

    /// Cap the throttled retries per message; 0 retries forever
    pub fn with_max_throttle_retries(mut self, max: u32) -> Self {
        self.max_throttle_retries = max;
        self
    }

    /// Replace the sleeper used while backing off
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Deliver a message, waiting out 429 answers as instructed by the server
    ///
    /// # Errors
    /// * `Delivery` - any status other than 200 or 429
    /// * `RetriesExhausted` - still throttled after the retry cap
    /// * `HttpRequest` - transport failure
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let mut throttled: u32 = 0;
        loop {
            match self.attempt(text).await {
                Ok(()) => {
                    debug!("Sent Telegram message (length={})", text.len());
                    return Ok(());
                }
                Err(ClientError::RateLimit {
                    retry_after_seconds,
                    ..
                }) => {
                    throttled += 1;
                    if self.max_throttle_retries > 0 && throttled > self.max_throttle_retries {
                        return Err(ClientError::RetriesExhausted {
                            attempts: throttled,
                        });
                    }
                    let wait = retry_after_seconds
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
                        .max(DEFAULT_RETRY_AFTER_SECS);
                    warn!("Rate limit hit, retrying after {} seconds...", wait);
                    self.sleeper.sleep(Duration::from_secs(wait)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One `sendMessage` request; a 429 comes back as `RateLimit`
    async fn attempt(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&SendMessageForm {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| ClientError::HttpRequest(e.without_url()))?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let header_retry = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let parsed: ApiErrorResponse = serde_json::from_str(&body).unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimit {
                retry_after_seconds: parsed.retry_after().or(header_retry),
                message: parsed
                    .description
                    .unwrap_or_else(|| "Too Many Requests".to_string()),
            });
        }

        Err(ClientError::Delivery {
            status: status.as_u16(),
            body: parsed.description.unwrap_or(body),
        })
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .field("max_throttle_retries", &self.max_throttle_retries)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.send_message(text).await
    }
}
