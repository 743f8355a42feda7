//! Trait definitions for the monitor's collaborators
//!
//! The position monitor only talks to these seams, so the trading API, the
//! messaging channel and time itself can be swapped out in tests.

use async_trait::async_trait;
use std::time::Duration;

use super::errors::Result;
use super::types::{PositionDetail, PositionSnapshot, Session};

/// Obtains an authenticated session from the trading API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Authenticate and return a fresh session
    ///
    /// Any non-success answer is an `Authentication` error; no retry happens here.
    async fn acquire(&self) -> Result<Session>;
}

/// Reads open positions from the trading API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Fetch every open position
    ///
    /// An account with no open positions yields an empty snapshot, not an error.
    async fn fetch_positions(&self, session: &Session) -> Result<PositionSnapshot>;

    /// Fetch the full detail of one position
    ///
    /// # Arguments
    /// * `session` - Authenticated session
    /// * `deal_id` - Deal identifier of the position
    async fn fetch_position(&self, session: &Session, deal_id: &str) -> Result<PositionDetail>;
}

/// Delivers text messages to the messaging channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message, absorbing throttling internally
    async fn send(&self, text: &str) -> Result<()>;
}

/// Timed suspension used between polls and while backing off
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
