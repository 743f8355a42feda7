//! Capital.com client bound to one account's credentials

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

use super::rest::CapitalRestClient;
use crate::common::errors::Result;
use crate::common::traits::{PositionSource, SessionProvider};
use crate::common::types::{PositionDetail, PositionSnapshot, Session};
use crate::config::types::{CapitalConfig, CapitalCredentials};

/// Capital.com client for one account
#[derive(Debug, Clone)]
pub struct CapitalClient {
    /// REST API client
    rest_client: CapitalRestClient,
    /// Account credentials
    credentials: CapitalCredentials,
}

impl CapitalClient {
    /// Create a new Capital.com client from configuration
    pub fn new(config: &CapitalConfig, timeout: Duration) -> Result<Self> {
        let rest_client = CapitalRestClient::with_timeout(&config.rest_url, timeout)?;
        Ok(Self::with_rest_client(rest_client, config.credentials()))
    }

    /// Create a client around an existing REST client
    pub fn with_rest_client(rest_client: CapitalRestClient, credentials: CapitalCredentials) -> Self {
        Self {
            rest_client,
            credentials,
        }
    }

    /// Get a reference to the REST client
    pub fn rest(&self) -> &CapitalRestClient {
        &self.rest_client
    }
}

#[async_trait]
impl SessionProvider for CapitalClient {
    #[instrument(skip(self))]
    async fn acquire(&self) -> Result<Session> {
        let session = self.rest_client.create_session(&self.credentials).await?;
        info!("Authenticated against {}", self.rest_client.base_url());
        Ok(session)
    }
}

#[async_trait]
impl PositionSource for CapitalClient {
    async fn fetch_positions(&self, session: &Session) -> Result<PositionSnapshot> {
        self.rest_client.get_positions(session).await
    }

    async fn fetch_position(&self, session: &Session, deal_id: &str) -> Result<PositionDetail> {
        self.rest_client.get_position(session, deal_id).await
    }
}
