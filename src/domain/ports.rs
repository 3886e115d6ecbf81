use crate::domain::model::{DataSource, ForecastPoint};
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Successful transport reply: a 2xx status and the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure, split by whether the remote service answered.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The provider replied with a non-success status.
    Response {
        status: u16,
        body: serde_json::Value,
    },
    /// The request never produced a response (DNS, connect, TLS, body read, ...).
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response { status, body } => write!(f, "HTTP {}: {}", status, body),
            Self::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_points(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> std::result::Result<Vec<ForecastPoint>, ClientError>;

    fn name(&self) -> &'static str;

    fn source(&self) -> DataSource;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn api_token(&self) -> &str;

    fn source(&self) -> DataSource {
        DataSource::Noaa
    }

    fn concurrent_requests(&self) -> usize {
        1
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
