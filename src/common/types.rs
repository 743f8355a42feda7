//! Domain types shared by the trading client, the reconciler and the notifier

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of an open position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// Authenticated trading API session
///
/// Tokens are opaque and never refreshed in place; a new session replaces the old one.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Client session token (`CST` header)
    pub cst: String,
    /// Account security token (`X-SECURITY-TOKEN` header)
    pub security_token: String,
    /// When the session was obtained
    pub acquired_at: DateTime<Utc>,
}

impl Session {
    /// Create a session stamped with the current time
    pub fn new(cst: impl Into<String>, security_token: impl Into<String>) -> Self {
        Self {
            cst: cst.into(),
            security_token: security_token.into(),
            acquired_at: Utc::now(),
        }
    }

    /// Time elapsed since the session was obtained
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.acquired_at)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cst", &"<redacted>")
            .field("security_token", &"<redacted>")
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

/// Summary of one open position, as listed by the snapshot endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Unique deal identifier
    pub deal_id: String,
    /// BUY or SELL
    pub direction: Direction,
    /// Human-readable instrument name
    pub instrument_name: String,
    /// Entry level, when the listing carries one
    pub level: Option<Decimal>,
    /// Payload as received from the API
    pub raw: serde_json::Value,
}

/// Full detail of one position, fetched per deal
#[derive(Debug, Clone, PartialEq)]
pub struct PositionDetail {
    /// Unique deal identifier
    pub deal_id: String,
    /// BUY or SELL
    pub direction: Direction,
    /// Human-readable instrument name
    pub instrument_name: String,
    /// Entry level
    pub level: Decimal,
    /// Position size
    pub size: Option<Decimal>,
    /// Position currency
    pub currency: Option<String>,
    /// When the position was opened
    pub created_at: Option<DateTime<Utc>>,
    /// Payload as received from the API
    pub raw: serde_json::Value,
}

impl PositionDetail {
    /// Entry level as the API wrote it, so `5000.0` keeps its fraction
    pub fn level_text(&self) -> String {
        match &self.raw["position"]["level"] {
            serde_json::Value::Number(level) => level.to_string(),
            _ => self.level.to_string(),
        }
    }
}

/// All open positions at one poll instant, keyed by deal id
///
/// Iteration follows the order in which the API listed the positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSnapshot {
    positions: Vec<Position>,
    index: HashMap<String, usize>,
}

impl PositionSnapshot {
    /// Build a snapshot; a repeated deal id replaces the earlier entry in place
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut snapshot = Self::default();
        for position in positions {
            snapshot.insert(position);
        }
        snapshot
    }

    fn insert(&mut self, position: Position) {
        match self.index.get(&position.deal_id) {
            Some(&slot) => self.positions[slot] = position,
            None => {
                self.index
                    .insert(position.deal_id.clone(), self.positions.len());
                self.positions.push(position);
            }
        }
    }

    /// Look up a position by deal id
    pub fn get(&self, deal_id: &str) -> Option<&Position> {
        self.index.get(deal_id).map(|&slot| &self.positions[slot])
    }

    /// Check whether a deal id is open in this snapshot
    pub fn contains(&self, deal_id: &str) -> bool {
        self.index.contains_key(deal_id)
    }

    /// Iterate positions in listing order
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    /// Deal ids in listing order
    pub fn deal_ids(&self) -> impl Iterator<Item = &str> {
        self.positions.iter().map(|p| p.deal_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<Position> for PositionSnapshot {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self::new(iter)
    }
}
