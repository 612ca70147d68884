//! Transport seam between the executor and the network

use crate::error::TransportError;
use crate::spec::RequestDescription;
use async_trait::async_trait;
use serde_json::Value;

/// Issues a described request and returns the response body
///
/// A body that is not valid JSON is returned as a JSON string holding the
/// raw text. Any failure to obtain a response is an error; HTTP status codes
/// are not interpreted.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: &RequestDescription) -> Result<Value, TransportError>;
}

/// Parse a response body, falling back to the raw text
pub fn parse_body(raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw),
    }
}
