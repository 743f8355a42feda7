//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Capital.com trading API configuration
    pub capital: CapitalConfig,
    /// Telegram bot configuration
    pub telegram: TelegramConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Capital.com trading API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct CapitalConfig {
    /// API key sent as `X-CAP-API-KEY`
    #[serde(default)]
    pub api_key: String,
    /// Account login identifier
    #[serde(default)]
    pub login: String,
    /// Account password
    #[serde(default)]
    pub password: String,
    /// Base URL for the REST API
    #[serde(default = "default_capital_rest_url")]
    pub rest_url: String,
}

impl CapitalConfig {
    /// Credentials used to open a session
    pub fn credentials(&self) -> CapitalCredentials {
        CapitalCredentials::new(
            self.api_key.clone(),
            self.login.clone(),
            self.password.clone(),
        )
    }
}

impl std::fmt::Debug for CapitalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapitalConfig")
            .field("login", &self.login)
            .field("rest_url", &self.rest_url)
            .finish_non_exhaustive()
    }
}

fn default_capital_rest_url() -> String {
    "https://api-capital.backend-capital.com/api/v1".to_string()
}

/// Telegram bot configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    #[serde(default)]
    pub token: String,
    /// Target chat identifier
    #[serde(default)]
    pub chat_id: String,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Delay between position polls in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum throttled retries per message (0 = infinite)
    #[serde(default = "default_max_throttle_retries")]
    pub max_throttle_retries: u32,
    /// Open a new session instead of stopping when the current one expires
    #[serde(default)]
    pub reauthenticate_on_expiry: bool,
}

impl AppSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_seconds: default_poll_interval(),
            request_timeout_seconds: default_request_timeout(),
            max_throttle_retries: default_max_throttle_retries(),
            reauthenticate_on_expiry: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval() -> u64 {
    1
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_throttle_retries() -> u32 {
    10
}

/// Credentials for opening a trading API session
#[derive(Clone)]
pub struct CapitalCredentials {
    pub api_key: String,
    pub identifier: String,
    pub password: String,
}

impl CapitalCredentials {
    pub fn new(api_key: String, identifier: String, password: String) -> Self {
        Self {
            api_key,
            identifier,
            password,
        }
    }
}

impl std::fmt::Debug for CapitalCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapitalCredentials")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}
