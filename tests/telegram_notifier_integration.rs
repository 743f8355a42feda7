//! Integration tests for the Telegram notifier
//!
//! The Bot API is replaced by a wiremock server; backoff waits go through a
//! `RecordingSleeper` so throttling scenarios finish instantly.

mod common;

use common::*;
use position_notifier::{ClientError, Notifier, RecordingSleeper};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_throttled(server: &MockServer, retry_after: u64) {
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(429).set_body_json(throttled_body(retry_after)))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn mount_sent(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent_body()))
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_send_posts_chat_id_and_text_as_form() {
    let server = MockServer::start().await;
    mount_sent(&server).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone());

    assert_ok!(notifier.send("SELL order closed: Trading: EUR/USD").await);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let fields: Vec<(String, String)> = url::form_urlencoded::parse(&requests[0].body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("chat_id".to_string(), CHAT_ID.to_string()),
            (
                "text".to_string(),
                "SELL order closed: Trading: EUR/USD".to_string()
            ),
        ]
    );
    assert!(sleeper.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_throttled_send_waits_as_instructed_then_succeeds() {
    let server = MockServer::start().await;
    // Mounted first, matched first
    mount_throttled(&server, 2).await;
    mount_throttled(&server, 1).await;
    mount_sent(&server).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone());

    assert_ok!(notifier.send("BUY order opened: Trading: GOLD Position price: 2310.4").await);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(
            form_text(&request.body).as_deref(),
            Some("BUY order opened: Trading: GOLD Position price: 2310.4")
        );
    }
    assert_eq!(
        sleeper.calls(),
        vec![Duration::from_secs(2), Duration::from_secs(1)]
    );
}

#[tokio::test]
async fn test_throttle_without_hint_falls_back_to_header_then_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "3")
                .set_body_json(json!({"ok": false, "error_code": 429})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_sent(&server).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone());

    assert_ok!(notifier.send("hello").await);
    assert_eq!(
        sleeper.calls(),
        vec![Duration::from_secs(3), Duration::from_secs(1)]
    );
}

#[tokio::test]
async fn test_throttle_cap_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(429).set_body_json(throttled_body(5)))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone()).with_max_throttle_retries(2);

    let err = assert_err!(notifier.send("hello").await);
    assert!(
        matches!(err, ClientError::RetriesExhausted { attempts: 3 }),
        "{:?}",
        err
    );
    assert!(err.is_delivery_failure());

    // Initial attempt plus two retries
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(5); 2]);
}

#[tokio::test]
async fn test_unlimited_retries_keep_going() {
    let server = MockServer::start().await;
    for _ in 0..12 {
        mount_throttled(&server, 1).await;
    }
    mount_sent(&server).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone()).with_max_throttle_retries(0);

    assert_ok!(notifier.send("hello").await);
    assert_eq!(sleeper.calls().len(), 12);
    assert_eq!(server.received_requests().await.unwrap().len(), 13);
}

#[test_log::test(tokio::test)]
async fn test_other_failures_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone());

    match notifier.send("hello").await {
        Err(ClientError::Delivery { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "Bad Request: chat not found");
        }
        other => panic!("Expected delivery error, got {:?}", other),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert!(sleeper.calls().is_empty());
}

#[tokio::test]
async fn test_server_error_with_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let notifier = notifier(&server.uri(), Arc::new(RecordingSleeper::new()));

    match notifier.send("hello").await {
        Err(ClientError::Delivery { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("Expected delivery error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_error_hides_token() {
    // Nothing listens on port 1
    let notifier = notifier("http://127.0.0.1:1", Arc::new(RecordingSleeper::new()));

    let err = assert_err!(notifier.send("hello").await);
    assert!(matches!(err, ClientError::HttpRequest(_)), "{:?}", err);
    assert!(!err.to_string().contains(BOT_TOKEN), "{}", err);
}

#[tokio::test]
async fn test_zero_retry_after_still_pauses() {
    let server = MockServer::start().await;
    mount_throttled(&server, 0).await;
    mount_sent(&server).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let notifier = notifier(&server.uri(), sleeper.clone()).with_max_throttle_retries(0);

    assert_ok!(notifier.send("hello").await);
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(1)]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[test]
fn test_form_text_decoding() {
    let body = b"chat_id=-100200300&text=BUY+order+opened%3A+Trading%3A+GOLD";
    assert_eq!(
        form_text(body).as_deref(),
        Some("BUY order opened: Trading: GOLD")
    );
}
