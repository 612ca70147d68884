//! In-process HTTP server for transport and suite tests

#![allow(dead_code)]

use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

/// Start the test server on an ephemeral port and return its base URL
pub async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/", get(|| async { Json(json!({"message": "API running."})) }))
        .route(
            "/api/config",
            get(|| async {
                Json(json!({
                    "location_name": "Home",
                    "unit_system": {"length": "km", "temperature": "°C"},
                    "version": "2026.10.0"
                }))
            }),
        )
        .route("/text", get(|| async { "plain text" }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))) }),
        )
        .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
        .route(
            "/headers",
            get(|headers: HeaderMap| async move {
                let token = headers
                    .get("x-token")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({"token": token}))
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        )
        .route("/method", any(|method: Method| async move { method.to_string() }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// A URL on a port nothing listens on
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}
