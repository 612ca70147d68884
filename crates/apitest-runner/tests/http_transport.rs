//! Tests for the reqwest transport against a local server

mod common;

use apitest_runner::{HttpTransport, RequestDescription, Transport, TransportError};
use common::{closed_url, spawn_server};
use serde_json::json;
use std::time::Duration;

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_json_body() {
    let base = spawn_server().await;
    let body = transport()
        .dispatch(&RequestDescription::get(format!("{}/api/", base)))
        .await
        .unwrap();

    assert_eq!(body, json!({"message": "API running."}));
}

#[tokio::test]
async fn test_raw_text_fallback() {
    let base = spawn_server().await;
    let body = transport()
        .dispatch(&RequestDescription::get(format!("{}/text", base)))
        .await
        .unwrap();

    assert_eq!(body, json!("plain text"));
}

#[tokio::test]
async fn test_error_status_is_not_a_transport_failure() {
    let base = spawn_server().await;
    let body = transport()
        .dispatch(&RequestDescription::get(format!("{}/missing", base)))
        .await
        .unwrap();

    assert_eq!(body, json!({"message": "Not found"}));
}

#[tokio::test]
async fn test_post_json_body() {
    let base = spawn_server().await;
    let sent = json!({"state": "on", "attributes": {"brightness": 255}});
    let body = transport()
        .dispatch(&RequestDescription::post(format!("{}/echo", base), sent.clone()))
        .await
        .unwrap();

    assert_eq!(body, sent);
}

#[tokio::test]
async fn test_headers_are_sent() {
    let base = spawn_server().await;
    let request =
        RequestDescription::get(format!("{}/headers", base)).with_header("X-Token", "secret");
    let body = transport().dispatch(&request).await.unwrap();

    assert_eq!(body, json!({"token": "secret"}));
}

#[tokio::test]
async fn test_method_is_case_insensitive() {
    let base = spawn_server().await;
    let mut request = RequestDescription::get(format!("{}/method", base));
    request.method = "patch".to_string();

    assert_eq!(transport().dispatch(&request).await.unwrap(), json!("PATCH"));
}

#[tokio::test]
async fn test_invalid_method() {
    let mut request = RequestDescription::get("http://127.0.0.1:9/");
    request.method = "NOT A METHOD".to_string();

    let err = transport().dispatch(&request).await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidMethod(_)));
}

#[tokio::test]
async fn test_request_timeout() {
    let base = spawn_server().await;
    let mut request = RequestDescription::get(format!("{}/slow", base));
    request.timeout_ms = Some(50);

    let err = transport().dispatch(&request).await.unwrap_err();
    assert!(matches!(err, TransportError::Request { .. }));
}

#[tokio::test]
async fn test_connection_refused() {
    let url = closed_url().await;
    let err = transport()
        .dispatch(&RequestDescription::get(url.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Request { .. }));
    assert!(err.to_string().contains(&url));
}

#[tokio::test]
async fn test_wait_for_ready() {
    let base = spawn_server().await;
    let transport = transport();

    assert!(transport.is_ready(&format!("{}/api/", base)).await);
    assert!(!transport.is_ready(&format!("{}/missing", base)).await);
    assert!(
        transport
            .wait_for_ready(&format!("{}/api/", base), Duration::from_secs(1))
            .await
    );
    assert!(
        !transport
            .wait_for_ready(&closed_url().await, Duration::from_millis(100))
            .await
    );
}
