//! HTTP transport contract
//!
//! Remote collection services are JSON-over-POST APIs. A provider builds an
//! [`HttpRequest`], hands it to the injected [`HttpClient`] and interprets the
//! status of the returned [`HttpResponse`] itself.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// A JSON POST to one endpoint
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Serialize `payload` as the body of a POST to `url`.
    pub fn post_json<T: Serialize>(url: impl Into<String>, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| BridgeError::OperationFailed(format!("Cannot encode request body: {}", e)))?;

        Ok(Self {
            url: url.into(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: Bytes::from(body),
            timeout: None,
        })
    }

    /// Merge `headers` into the request; later values win.
    pub fn with_headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| BridgeError::OperationFailed(format!("Cannot decode response body: {}", e)))
    }

    /// Body as UTF-8, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Moves requests over the wire.
///
/// Every HTTP status comes back as `Ok`; `Err` means the exchange itself
/// failed (DNS, TLS, connect or timeout).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_json_sets_body_and_content_type() {
        let request =
            HttpRequest::post_json("https://music.youtube.com/youtubei/v1/browse", &json!({ "playlistId": "PL1" }))
                .unwrap();

        assert_eq!(request.headers["Content-Type"], "application/json");
        assert_eq!(request.body, Bytes::from(r#"{"playlistId":"PL1"}"#));
        assert!(request.timeout.is_none());
    }

    #[test]
    fn test_with_headers_overrides() {
        let extra = HashMap::from([
            ("cookie".to_string(), "SAPISID=abc".to_string()),
            ("Content-Type".to_string(), "application/json; charset=utf-8".to_string()),
        ]);

        let request = HttpRequest::post_json("https://example.com", &json!({}))
            .unwrap()
            .with_headers(&extra)
            .with_timeout(Duration::from_secs(30));

        assert_eq!(request.headers["cookie"], "SAPISID=abc");
        assert_eq!(request.headers["Content-Type"], "application/json; charset=utf-8");
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_response_classification() {
        let ok = HttpResponse::new(200, r#"{"status":"STATUS_SUCCEEDED"}"#);
        assert!(ok.is_success());
        assert_eq!(ok.json::<serde_json::Value>().unwrap()["status"], "STATUS_SUCCEEDED");

        let unavailable = HttpResponse::new(503, "try later");
        assert!(unavailable.is_server_error());
        assert_eq!(unavailable.text(), "try later");

        let conflict = HttpResponse::new(409, "conflict");
        assert!(!conflict.is_success());
        assert!(!conflict.is_server_error());
    }
}
