use crate::adapters::http::ReqwestTransport;
use crate::core::normalizer::{ForecastNormalizer, ValidityPolicy};
use crate::domain::model::{DataSource, ForecastPoint, Metric, RawForecastResponse};
use crate::domain::ports::{ConfigProvider, ForecastProvider, HttpTransport, TransportError};
use crate::utils::error::{ClientError, PROVIDER_NAME};
use async_trait::async_trait;
use std::collections::HashMap;

pub const DEFAULT_API_URL: &str = "https://api.stormglass.io/v2";

/// Values the client needs, resolved once at startup and never re-read.
#[derive(Debug, Clone, PartialEq)]
pub struct StormGlassConfig {
    pub api_url: String,
    pub api_token: String,
    pub source: DataSource,
    pub validity: ValidityPolicy,
}

impl StormGlassConfig {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            source: DataSource::Noaa,
            validity: ValidityPolicy::default(),
        }
    }

    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            api_url: config.api_url().to_string(),
            api_token: config.api_token().to_string(),
            source: config.source(),
            validity: ValidityPolicy::default(),
        }
    }

    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_validity(mut self, validity: ValidityPolicy) -> Self {
        self.validity = validity;
        self
    }
}

/// StormGlass `weather/point` client.
///
/// Holds only immutable configuration and its transport, so one instance can be shared
/// across tasks. Each [`fetch_points`](Self::fetch_points) call makes exactly one request
/// and never retries.
pub struct StormGlass<T: HttpTransport = ReqwestTransport> {
    config: StormGlassConfig,
    params: String,
    normalizer: ForecastNormalizer,
    transport: T,
}

impl StormGlass<ReqwestTransport> {
    pub fn with_default_transport(config: StormGlassConfig) -> Self {
        Self::new(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> StormGlass<T> {
    pub fn new(config: StormGlassConfig, transport: T) -> Self {
        let normalizer = ForecastNormalizer::new(config.source).with_policy(config.validity);
        Self {
            config,
            params: Metric::request_params(),
            normalizer,
            transport,
        }
    }

    pub fn config(&self) -> &StormGlassConfig {
        &self.config
    }

    pub fn build_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/weather/point?lat={}&lng={}&params={}&source={}",
            self.config.api_url.trim_end_matches('/'),
            latitude,
            longitude,
            self.params,
            self.config.source
        )
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), self.config.api_token.clone());
        headers
    }

    pub async fn fetch_points(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPoint>, ClientError> {
        let url = self.build_url(latitude, longitude);
        tracing::debug!("Requesting {} forecast: {}", PROVIDER_NAME, url);

        let response = self
            .transport
            .get(&url, &self.headers())
            .await
            .map_err(Self::classify)?;

        let raw: RawForecastResponse = serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!("{} payload could not be decoded: {}", PROVIDER_NAME, e);
            ClientError::client_request(e.to_string())
        })?;

        let points = self.normalizer.normalize(raw);
        tracing::debug!(
            "Normalized {} forecast points for ({}, {})",
            points.len(),
            latitude,
            longitude
        );
        Ok(points)
    }

    fn classify(error: TransportError) -> ClientError {
        match error {
            TransportError::Response { status, body } => {
                tracing::warn!("{} responded with status {}", PROVIDER_NAME, status);
                ClientError::response(&body, status)
            }
            TransportError::Other(message) => {
                tracing::warn!("Request to {} failed: {}", PROVIDER_NAME, message);
                ClientError::client_request(message)
            }
        }
    }
}

#[async_trait]
impl<T: HttpTransport> ForecastProvider for StormGlass<T> {
    async fn fetch_points(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPoint>, ClientError> {
        StormGlass::fetch_points(self, latitude, longitude).await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn source(&self) -> DataSource {
        self.config.source
    }
}
