//! Common test utilities and fixtures
#![allow(dead_code)]

use position_notifier::config::types::CapitalCredentials;
use position_notifier::{CapitalClient, CapitalRestClient, TelegramNotifier};
use serde_json::{json, Value};
use std::sync::Arc;

use position_notifier::RecordingSleeper;

pub const API_KEY: &str = "test-api-key";
pub const LOGIN: &str = "trader@example.com";
pub const PASSWORD: &str = "hunter2";
pub const CST: &str = "cst-token-123";
pub const SECURITY_TOKEN: &str = "xst-token-456";
pub const BOT_TOKEN: &str = "123456:TEST-TOKEN";
pub const CHAT_ID: &str = "-100200300";

/// Path of the Bot API sendMessage endpoint for the test token
pub fn send_message_path() -> String {
    format!("/bot{}/sendMessage", BOT_TOKEN)
}

pub fn credentials() -> CapitalCredentials {
    CapitalCredentials::new(API_KEY.to_string(), LOGIN.to_string(), PASSWORD.to_string())
}

/// Capital client pointed at a mock server
pub fn capital_client(base_url: &str) -> CapitalClient {
    let rest = CapitalRestClient::new(base_url).expect("Failed to create REST client");
    CapitalClient::with_rest_client(rest, credentials())
}

/// Notifier pointed at a mock server, backing off through a recording sleeper
pub fn notifier(api_url: &str, sleeper: Arc<RecordingSleeper>) -> TelegramNotifier {
    TelegramNotifier::new(api_url, BOT_TOKEN, CHAT_ID)
        .expect("Failed to create notifier")
        .with_sleeper(sleeper)
}

/// One entry as listed by `GET /positions` and returned by `GET /positions/{dealId}`
pub fn position_entry(deal_id: &str, direction: &str, instrument: &str, level: f64) -> Value {
    json!({
        "position": {
            "contractSize": 1,
            "createdDate": "2024-03-01T10:15:42.512",
            "createdDateUTC": "2024-03-01T09:15:42.512",
            "dealId": deal_id,
            "dealReference": format!("p_{}", deal_id),
            "workingOrderId": deal_id,
            "size": 1,
            "leverage": 30,
            "upl": 0.0,
            "direction": direction,
            "level": level,
            "currency": "USD",
            "guaranteedStop": false
        },
        "market": {
            "instrumentName": instrument,
            "expiry": "-",
            "marketStatus": "TRADEABLE",
            "epic": instrument.replace('/', ""),
            "symbol": instrument,
            "instrumentType": "CURRENCIES",
            "lotSize": 1,
            "bid": level,
            "offer": level
        }
    })
}

/// Body of `GET /positions`
pub fn positions_body(entries: Vec<Value>) -> Value {
    json!({ "positions": entries })
}

/// Body of a throttled `sendMessage`
pub fn throttled_body(retry_after: u64) -> Value {
    json!({
        "ok": false,
        "error_code": 429,
        "description": format!("Too Many Requests: retry after {}", retry_after),
        "parameters": { "retry_after": retry_after }
    })
}

/// Body of a successful `sendMessage`
pub fn sent_body() -> Value {
    json!({
        "ok": true,
        "result": { "message_id": 1, "chat": { "id": -100200300 }, "text": "ok" }
    })
}

/// Decode the `text` field of a form-encoded `sendMessage` body
pub fn form_text(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
}
