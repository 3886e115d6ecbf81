use crate::domain::ports::{HttpTransport, TransportError, TransportResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// reqwest-backed transport. Timeouts are enforced here, never by the provider client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    // 錯誤回應的 body 盡量保留為 JSON，非 JSON 時包成字串
    fn parse_error_body(text: String) -> serde_json::Value {
        serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Other(format!("request timeout: {}", e))
            } else if e.is_connect() {
                TransportError::Other(format!("connection failed: {}", e))
            } else {
                TransportError::Other(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Other(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(TransportError::Response {
                status: status.as_u16(),
                body: Self::parse_error_body(body),
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
