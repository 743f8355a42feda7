//! REST API client for Capital.com

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::{session_from_headers, API_KEY_HEADER};
use super::messages::*;
use crate::common::errors::{ClientError, Result};
use crate::common::types::{PositionDetail, PositionSnapshot, Session};
use crate::config::types::CapitalCredentials;

/// REST API client for Capital.com
#[derive(Debug, Clone)]
pub struct CapitalRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the REST API
    base_url: String,
}

impl CapitalRestClient {
    /// Create a new REST client
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open a trading session
    ///
    /// Only an HTTP 200 carrying both session headers counts as success.
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier))]
    pub async fn create_session(&self, credentials: &CapitalCredentials) -> Result<Session> {
        let url = format!("{}/session", self.base_url);
        let body = SessionRequest {
            identifier: &credentials.identifier,
            password: &credentials.password,
            encrypted_password: false,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Authentication(format!(
                "session request returned status {}: {}",
                status,
                describe_error_body(&body)
            )));
        }

        let session = session_from_headers(response.headers())?;
        debug!("Session established");
        Ok(session)
    }

    /// Get every open position
    #[instrument(skip(self, session))]
    pub async fn get_positions(&self, session: &Session) -> Result<PositionSnapshot> {
        let url = format!("{}/positions", self.base_url);
        let response = session.apply_to_request(self.client.get(&url)).send().await?;
        let response = check_status(response, "GET /positions").await?;

        let body: serde_json::Value = response.json().await?;
        debug!("get_positions response: {}", pretty(&body));

        let positions: PositionsResponse = serde_json::from_value(body)?;
        positions
            .positions
            .into_iter()
            .map(PositionEntry::summary_from_value)
            .collect::<Result<PositionSnapshot>>()
    }

    /// Get the full detail of one position
    #[instrument(skip(self, session))]
    pub async fn get_position(&self, session: &Session, deal_id: &str) -> Result<PositionDetail> {
        let url = format!("{}/positions/{}", self.base_url, deal_id);
        let response = session.apply_to_request(self.client.get(&url)).send().await?;
        let response = check_status(response, "GET /positions/{dealId}").await?;

        let body: serde_json::Value = response.json().await?;
        debug!("get_position response: {}", pretty(&body));

        PositionEntry::detail_from_value(body)
    }
}

/// Map a non-200 answer to the matching error, 401 being an expired session
async fn check_status(response: Response, endpoint: &str) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::SessionExpired(format!(
            "{} rejected session: {}",
            endpoint,
            describe_error_body(&body)
        )));
    }

    Err(ClientError::UnexpectedStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body: describe_error_body(&body),
    })
}

/// Prefer the API's `errorCode` over the raw body
fn describe_error_body(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error_code)
        .unwrap_or_else(|_| body.to_string())
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
