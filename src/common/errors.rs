//! Error types for the application

use thiserror::Error;

/// Result type alias using our ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The trading API rejected the session tokens
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Non-200 answer from an endpoint that has no recovery path
    #[error("{endpoint} returned status {status}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}, retry after {retry_after_seconds:?} seconds")]
    RateLimit {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// Message delivery rejected by the messaging channel
    #[error("Message delivery failed with status {status}: {body}")]
    Delivery { status: u16, body: String },

    /// The channel kept throttling past the configured retry cap
    #[error("Message delivery gave up after {attempts} throttled attempts")]
    RetriesExhausted { attempts: u32 },

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// True when the trading API reported that the session tokens are no longer valid
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired(_))
    }

    /// True for failures reported by the messaging channel
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Delivery { .. } | ClientError::RetriesExhausted { .. }
        )
    }
}

/// Terminal states of the position monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Session acquisition failed
    #[error("session acquisition failed: {0}")]
    AuthFailed(#[source] ClientError),

    /// Snapshot retrieval failed while seeding or polling
    #[error("position snapshot fetch failed: {0}")]
    FetchFailed(#[source] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expired_classification() {
        assert!(ClientError::SessionExpired("401".into()).is_session_expired());
        assert!(!ClientError::Authentication("bad password".into()).is_session_expired());
    }

    #[test]
    fn test_delivery_failure_classification() {
        let rejected = ClientError::Delivery {
            status: 400,
            body: "chat not found".into(),
        };
        assert!(rejected.is_delivery_failure());
        assert!(ClientError::RetriesExhausted { attempts: 3 }.is_delivery_failure());
        assert!(!ClientError::Internal("x".into()).is_delivery_failure());
    }

    #[test]
    fn test_monitor_error_display() {
        let err = MonitorError::FetchFailed(ClientError::UnexpectedStatus {
            endpoint: "GET /positions".into(),
            status: 500,
            body: "oops".into(),
        });
        assert_eq!(
            err.to_string(),
            "position snapshot fetch failed: GET /positions returned status 500: oops"
        );
    }
}
