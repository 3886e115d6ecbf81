use crate::core::normalizer::ValidityPolicy;
use crate::core::output::{self, OutputFormat};
use crate::core::stormglass::{StormGlassConfig, DEFAULT_API_URL};
use crate::domain::model::{DataSource, Spot};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub stormglass: StormGlassSection,
    #[serde(default)]
    pub fetch: FetchSection,
    pub output: OutputSection,
    #[serde(default)]
    pub spots: Vec<Spot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StormGlassSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub api_token: String,
    #[serde(default)]
    pub source: DataSource,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchSection {
    pub concurrent_requests: Option<usize>,
    pub treat_zero_as_missing: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ForecastError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORMGLASS_API_TOKEN})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("stormglass.api_url", &self.stormglass.api_url)?;

        // 未替換的 ${VAR} 代表環境變數沒設定
        if self.stormglass.api_token.starts_with("${") {
            return Err(ForecastError::MissingConfigError {
                field: "stormglass.api_token".to_string(),
            });
        }
        validation::validate_secret("stormglass.api_token", &self.stormglass.api_token)?;

        if let Some(timeout) = self.stormglass.timeout_seconds {
            validation::validate_positive_number("stormglass.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(concurrent) = self.fetch.concurrent_requests {
            validation::validate_positive_number("fetch.concurrent_requests", concurrent, 1)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        self.output_formats()?;

        // 每個地點寫出的檔名必須唯一，否則後寫的會覆蓋先寫的
        let mut stems: HashMap<String, &str> = HashMap::new();
        for (index, spot) in self.spots.iter().enumerate() {
            let field = format!("spots[{}].name", index);
            validation::validate_non_empty_string(&field, &spot.name)?;
            validation::validate_coordinates(&format!("spots[{}].", index), spot.lat, spot.lng)?;

            let stem = output::file_stem(&spot.name);
            if let Some(existing) = stems.insert(stem.clone(), &spot.name) {
                return Err(ForecastError::InvalidConfigValueError {
                    field,
                    value: spot.name.clone(),
                    reason: format!("Output file name '{}' is already used by spot '{}'", stem, existing),
                });
            }
        }

        Ok(())
    }

    pub fn output_formats(&self) -> Result<Vec<OutputFormat>> {
        self.output
            .formats
            .iter()
            .map(|format| format.parse())
            .collect()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.stormglass.timeout_seconds.map(Duration::from_secs)
    }

    pub fn validity_policy(&self) -> ValidityPolicy {
        if self.fetch.treat_zero_as_missing.unwrap_or(true) {
            ValidityPolicy::TreatZeroAsMissing
        } else {
            ValidityPolicy::RequirePresence
        }
    }

    pub fn stormglass_config(&self) -> StormGlassConfig {
        StormGlassConfig::from_provider(self).with_validity(self.validity_policy())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_url(&self) -> &str {
        &self.stormglass.api_url
    }

    fn api_token(&self) -> &str {
        &self.stormglass.api_token
    }

    fn source(&self) -> DataSource {
        self.stormglass.source
    }

    fn concurrent_requests(&self) -> usize {
        self.fetch.concurrent_requests.unwrap_or(4)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
