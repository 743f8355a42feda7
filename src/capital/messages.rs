//! Capital.com REST message types

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::{ClientError, Result};
use crate::common::types::{Direction, Position, PositionDetail};

/// Body of `POST /session`
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
    #[serde(rename = "encryptedPassword")]
    pub encrypted_password: bool,
}

/// Body of `GET /positions`; entries are kept raw and decoded one by one
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub positions: Vec<serde_json::Value>,
}

/// One entry of `GET /positions`, also the body of `GET /positions/{dealId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionEntry {
    pub position: PositionData,
    pub market: MarketData,
}

/// The `position` object of an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(rename = "dealId")]
    pub deal_id: String,
    pub direction: Direction,
    #[serde(default)]
    pub level: Option<Decimal>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(rename = "createdDateUTC", default)]
    pub created_date_utc: Option<String>,
}

/// The `market` object of an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(rename = "instrumentName")]
    pub instrument_name: String,
    #[serde(default)]
    pub epic: Option<String>,
}

/// Error body returned by the API on failures
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "errorCode")]
    pub error_code: String,
}

impl PositionEntry {
    /// Decode a raw entry into a summary position
    pub fn summary_from_value(raw: serde_json::Value) -> Result<Position> {
        let entry: PositionEntry = serde_json::from_value(raw.clone())?;
        Ok(Position {
            deal_id: entry.position.deal_id,
            direction: entry.position.direction,
            instrument_name: entry.market.instrument_name,
            level: entry.position.level,
            raw,
        })
    }

    /// Decode a raw entry into a position detail; the level is mandatory here
    pub fn detail_from_value(raw: serde_json::Value) -> Result<PositionDetail> {
        let entry: PositionEntry = serde_json::from_value(raw.clone())?;
        let level = entry.position.level.ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "position {} has no level",
                entry.position.deal_id
            ))
        })?;
        let created_at = entry
            .position
            .created_date_utc
            .as_deref()
            .and_then(parse_created_date);

        Ok(PositionDetail {
            deal_id: entry.position.deal_id,
            direction: entry.position.direction,
            instrument_name: entry.market.instrument_name,
            level,
            size: entry.position.size,
            currency: entry.position.currency,
            created_at,
            raw,
        })
    }
}

/// Timestamps come without an offset, e.g. `2024-03-01T09:15:42.512`
fn parse_created_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
