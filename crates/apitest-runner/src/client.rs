//! HTTP transport backed by reqwest

use crate::error::TransportError;
use crate::spec::RequestDescription;
use crate::transport::{parse_body, Transport};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default timeout applied to requests without their own `timeout_ms`
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between readiness checks
const READY_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Transport that sends requests over HTTP
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given default request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self { client })
    }

    /// Check whether `url` answers with a success status
    pub async fn is_ready(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Poll `url` until it is ready or `timeout` has elapsed
    pub async fn wait_for_ready(&self, url: &str, timeout: Duration) -> bool {
        let start = Instant::now();

        while start.elapsed() < timeout {
            if self.is_ready(url).await {
                return true;
            }
            debug!("{} not ready yet, retrying", url);
            tokio::time::sleep(READY_CHECK_INTERVAL.min(timeout.saturating_sub(start.elapsed())))
                .await;
        }

        false
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: &RequestDescription) -> Result<Value, TransportError> {
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| TransportError::InvalidMethod(request.method.clone()))?;

        let mut builder = self.client.request(method.clone(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        if let Some(ms) = request.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let request_error = |source: reqwest::Error| TransportError::Request {
            method: method.to_string(),
            url: request.url.clone(),
            source,
        };

        let response = builder.send().await.map_err(request_error)?;
        debug!("{} {} -> {}", method, request.url, response.status());

        let raw_body = response.text().await.map_err(request_error)?;
        Ok(parse_body(raw_body))
    }
}
