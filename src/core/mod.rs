pub mod batch;
pub mod normalizer;
pub mod output;
pub mod stormglass;

pub use crate::domain::model::{ForecastPoint, RawForecastResponse, RawHourPoint, Spot};
pub use crate::domain::ports::{ConfigProvider, ForecastProvider, HttpTransport, Storage};
pub use crate::utils::error::Result;
