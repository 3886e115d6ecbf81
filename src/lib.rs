pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{LocalStorage, ReqwestTransport};
pub use core::batch::{fetch_spots, SpotForecast};
pub use core::normalizer::{ForecastNormalizer, ValidityPolicy};
pub use core::output::OutputFormat;
pub use core::stormglass::{StormGlass, StormGlassConfig, DEFAULT_API_URL};
pub use domain::model::{
    DataSource, ForecastPoint, ForecastReport, Metric, RawForecastResponse, RawHourPoint,
    SourceValues, Spot,
};
pub use domain::ports::{HttpTransport, TransportError, TransportResponse};
pub use utils::error::{ClientError, ForecastError, Result};
