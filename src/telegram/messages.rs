//! Telegram Bot API message types

use serde::{Deserialize, Serialize};

/// Form body of `sendMessage`
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageForm<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Error body returned by the Bot API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Extra information attached to a failed call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before repeating a throttled request
    #[serde(default)]
    pub retry_after: Option<u64>,
}

impl ApiErrorResponse {
    pub fn retry_after(&self) -> Option<u64> {
        self.parameters.as_ref().and_then(|p| p.retry_after)
    }
}
