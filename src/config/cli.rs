use crate::core::normalizer::ValidityPolicy;
use crate::core::output::OutputFormat;
use crate::core::stormglass::{StormGlassConfig, DEFAULT_API_URL};
use crate::domain::model::DataSource;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "surf-forecast")]
#[command(about = "Fetch a normalized marine forecast for one point from StormGlass")]
pub struct CliConfig {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    #[arg(long, env = "STORMGLASS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, env = "STORMGLASS_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    #[arg(long, default_value = "noaa")]
    pub source: DataSource,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(long, help = "Abort the request after this many seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Keep hours whose values are exactly zero")]
    pub keep_zero_values: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn stormglass_config(&self) -> StormGlassConfig {
        let validity = if self.keep_zero_values {
            ValidityPolicy::RequirePresence
        } else {
            ValidityPolicy::TreatZeroAsMissing
        };
        StormGlassConfig::from_provider(self).with_validity(validity)
    }
}

impl ConfigProvider for CliConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn api_token(&self) -> &str {
        &self.api_token
    }

    fn source(&self) -> DataSource {
        self.source
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_url", &self.api_url)?;
        validation::validate_secret("api_token", &self.api_token)?;
        validation::validate_coordinates("", self.lat, self.lng)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout as usize, 1)?;
        }
        Ok(())
    }
}
