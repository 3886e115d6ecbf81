use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// StormGlass 回報數值的資料來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Sg,
    #[default]
    Noaa,
    Icon,
    Dwd,
    Meteo,
    Meto,
    Fcoo,
    Fmi,
    Yr,
    Smhi,
}

impl DataSource {
    pub const ALL: [DataSource; 10] = [
        DataSource::Sg,
        DataSource::Noaa,
        DataSource::Icon,
        DataSource::Dwd,
        DataSource::Meteo,
        DataSource::Meto,
        DataSource::Fcoo,
        DataSource::Fmi,
        DataSource::Yr,
        DataSource::Smhi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sg => "sg",
            Self::Noaa => "noaa",
            Self::Icon => "icon",
            Self::Dwd => "dwd",
            Self::Meteo => "meteo",
            Self::Meto => "meto",
            Self::Fcoo => "fcoo",
            Self::Fmi => "fmi",
            Self::Yr => "yr",
            Self::Smhi => "smhi",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|source| source.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown data source: '{}'. Valid sources: {}",
                    s,
                    Self::ALL.map(|source| source.as_str()).join(", ")
                )
            })
    }
}

/// The seven marine metrics requested from the provider, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    SwellDirection,
    SwellHeight,
    SwellPeriod,
    WaveDirection,
    WaveHeight,
    WindDirection,
    WindSpeed,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::SwellDirection,
        Metric::SwellHeight,
        Metric::SwellPeriod,
        Metric::WaveDirection,
        Metric::WaveHeight,
        Metric::WindDirection,
        Metric::WindSpeed,
    ];

    pub fn param_name(&self) -> &'static str {
        match self {
            Self::SwellDirection => "swellDirection",
            Self::SwellHeight => "swellHeight",
            Self::SwellPeriod => "swellPeriod",
            Self::WaveDirection => "waveDirection",
            Self::WaveHeight => "waveHeight",
            Self::WindDirection => "windDirection",
            Self::WindSpeed => "windSpeed",
        }
    }

    /// Comma-joined `params` query value.
    pub fn request_params() -> String {
        Self::ALL
            .iter()
            .map(Metric::param_name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 單一指標在各資料來源下的數值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceValues {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub sg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub noaa: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub icon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub dwd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub meteo: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub meto: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub fcoo: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub fmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub yr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub smhi: Option<f64>,
}

impl SourceValues {
    pub fn get(&self, source: DataSource) -> Option<f64> {
        match source {
            DataSource::Sg => self.sg,
            DataSource::Noaa => self.noaa,
            DataSource::Icon => self.icon,
            DataSource::Dwd => self.dwd,
            DataSource::Meteo => self.meteo,
            DataSource::Meto => self.meto,
            DataSource::Fcoo => self.fcoo,
            DataSource::Fmi => self.fmi,
            DataSource::Yr => self.yr,
            DataSource::Smhi => self.smhi,
        }
    }

    pub fn set(&mut self, source: DataSource, value: Option<f64>) {
        let slot = match source {
            DataSource::Sg => &mut self.sg,
            DataSource::Noaa => &mut self.noaa,
            DataSource::Icon => &mut self.icon,
            DataSource::Dwd => &mut self.dwd,
            DataSource::Meteo => &mut self.meteo,
            DataSource::Meto => &mut self.meto,
            DataSource::Fcoo => &mut self.fcoo,
            DataSource::Fmi => &mut self.fmi,
            DataSource::Yr => &mut self.yr,
            DataSource::Smhi => &mut self.smhi,
        };
        *slot = value;
    }

    pub fn with(mut self, source: DataSource, value: f64) -> Self {
        self.set(source, Some(value));
        self
    }
}

/// One hour as returned by `GET /weather/point`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHourPoint {
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub wave_height: Option<SourceValues>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub wave_direction: Option<SourceValues>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub swell_direction: Option<SourceValues>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub swell_height: Option<SourceValues>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub swell_period: Option<SourceValues>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub wind_direction: Option<SourceValues>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub wind_speed: Option<SourceValues>,
}

impl RawHourPoint {
    pub fn metric(&self, metric: Metric) -> Option<&SourceValues> {
        match metric {
            Metric::SwellDirection => self.swell_direction.as_ref(),
            Metric::SwellHeight => self.swell_height.as_ref(),
            Metric::SwellPeriod => self.swell_period.as_ref(),
            Metric::WaveDirection => self.wave_direction.as_ref(),
            Metric::WaveHeight => self.wave_height.as_ref(),
            Metric::WindDirection => self.wind_direction.as_ref(),
            Metric::WindSpeed => self.wind_speed.as_ref(),
        }
    }

    pub fn metric_mut(&mut self, metric: Metric) -> &mut Option<SourceValues> {
        match metric {
            Metric::SwellDirection => &mut self.swell_direction,
            Metric::SwellHeight => &mut self.swell_height,
            Metric::SwellPeriod => &mut self.swell_period,
            Metric::WaveDirection => &mut self.wave_direction,
            Metric::WaveHeight => &mut self.wave_height,
            Metric::WindDirection => &mut self.wind_direction,
            Metric::WindSpeed => &mut self.wind_speed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastResponse {
    #[serde(deserialize_with = "lenient_hours")]
    pub hours: Vec<RawHourPoint>,
}

/// One fully resolved forecast hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub time: String,
    pub wave_height: f64,
    pub wave_direction: f64,
    pub swell_direction: f64,
    pub swell_height: f64,
    pub swell_period: f64,
    pub wind_direction: f64,
    pub wind_speed: f64,
}

/// A named coordinate pair to forecast, e.g. a beach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Spot {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub spot: Spot,
    pub source: DataSource,
    pub fetched_at: DateTime<Utc>,
    pub points: Vec<ForecastPoint>,
}

impl ForecastReport {
    pub fn new(spot: Spot, source: DataSource, points: Vec<ForecastPoint>) -> Self {
        Self {
            spot,
            source,
            fetched_at: Utc::now(),
            points,
        }
    }
}

// 非數字一律視為缺值，避免單一欄位壞掉讓整批回應解析失敗
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::Value::deserialize(deserializer)?.as_f64())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::Value::deserialize(deserializer)?
        .as_str()
        .map(str::to_string))
}

fn lenient_sources<'de, D>(deserializer: D) -> Result<Option<SourceValues>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

// 非物件的小時項目以空白點代替，交給 normalizer 濾掉
fn lenient_hours<'de, D>(deserializer: D) -> Result<Vec<RawHourPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| {
            if value.is_object() {
                serde_json::from_value(value).unwrap_or_default()
            } else {
                RawHourPoint::default()
            }
        })
        .collect())
}
