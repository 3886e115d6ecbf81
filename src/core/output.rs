use crate::domain::model::{ForecastPoint, ForecastReport};
use crate::domain::ports::Storage;
use crate::utils::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Tsv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            other => Err(ForecastError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: json, csv, tsv".to_string(),
            }),
        }
    }
}

pub fn render(report: &ForecastReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_delimited(&report.points, b','),
        OutputFormat::Tsv => render_delimited(&report.points, b'\t'),
    }
}

pub fn render_json(report: &ForecastReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One row per point; the header row is written even when there are no points.
pub fn render_delimited(points: &[ForecastPoint], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record([
        "time",
        "waveHeight",
        "waveDirection",
        "swellDirection",
        "swellHeight",
        "swellPeriod",
        "windDirection",
        "windSpeed",
    ])?;
    for point in points {
        writer.serialize(point)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::ProcessingError {
            message: format!("Failed to flush delimited output: {}", e),
        })?;

    String::from_utf8(bytes).map_err(|e| ForecastError::ProcessingError {
        message: format!("Delimited output is not UTF-8: {}", e),
    })
}

/// 由地點名稱產生檔名，只保留小寫英數字、`-` 與 `_`
///
/// Path separators and dots are replaced, so the stem can never leave the output directory.
pub fn file_stem(spot_name: &str) -> String {
    let stem: String = spot_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        "spot".to_string()
    } else {
        stem.to_string()
    }
}

/// Renders one report per format and writes `{stem}.{ext}`, returning the written file names.
pub async fn write_report<S: Storage>(
    storage: &S,
    report: &ForecastReport,
    formats: &[OutputFormat],
) -> Result<Vec<String>> {
    let stem = file_stem(&report.spot.name);
    let mut written = Vec::with_capacity(formats.len());

    for format in formats {
        let filename = format!("{}.{}", stem, format.extension());
        let rendered = render(report, *format)?;
        storage.write_file(&filename, rendered.as_bytes()).await?;
        tracing::debug!("Wrote {} points to {}", report.points.len(), filename);
        written.push(filename);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::domain::model::{DataSource, Spot};
    use tempfile::TempDir;

    fn point() -> ForecastPoint {
        ForecastPoint {
            time: "2020-04-26T00:00:00+00:00".to_string(),
            wave_height: 0.47,
            wave_direction: 231.38,
            swell_direction: 64.26,
            swell_height: 0.15,
            swell_period: 3.89,
            wind_direction: 299.45,
            wind_speed: 100.0,
        }
    }

    #[test]
    fn test_csv_output() {
        let csv = render_delimited(&[point()], b',').unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "time,waveHeight,waveDirection,swellDirection,swellHeight,swellPeriod,windDirection,windSpeed"
        );
        assert_eq!(lines[1], "2020-04-26T00:00:00+00:00,0.47,231.38,64.26,0.15,3.89,299.45,100.0");
    }

    #[test]
    fn test_tsv_output_with_no_points_has_header_only() {
        let tsv = render_delimited(&[], b'\t').unwrap();
        assert_eq!(tsv.lines().count(), 1);
        assert!(tsv.starts_with("time\twaveHeight\t"));
    }

    #[test]
    fn test_json_report() {
        let report = ForecastReport::new(Spot::new("Manly", -33.792726, 151.289824), DataSource::Noaa, vec![point()]);
        let json: serde_json::Value = serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();

        assert_eq!(json["spot"]["name"], "Manly");
        assert_eq!(json["source"], "noaa");
        assert_eq!(json["points"][0]["windSpeed"], 100.0);
        assert!(json["fetchedAt"].is_string());
        assert!(json.get("fetched_at").is_none());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_file_stem_stays_inside_output_directory() {
        assert_eq!(file_stem("Manly"), "manly");
        assert_eq!(file_stem("Dee Why"), "dee_why");
        assert_eq!(file_stem("../x"), "x");
        assert_eq!(file_stem("a/b"), "a_b");
        assert_eq!(file_stem("..\\windows"), "windows");
        assert_eq!(file_stem("../.."), "spot");
        assert_eq!(file_stem("Bondi-North_2"), "bondi-north_2");
    }

    #[tokio::test]
    async fn test_write_report_writes_one_file_per_format() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let report = ForecastReport::new(Spot::new("../Escape Beach", 0.0, 0.0), DataSource::Noaa, vec![point()]);

        let written = write_report(&storage, &report, &[OutputFormat::Json, OutputFormat::Tsv])
            .await
            .unwrap();

        assert_eq!(written, vec!["escape_beach.json", "escape_beach.tsv"]);
        assert!(temp_dir.path().join("escape_beach.json").is_file());
        assert!(temp_dir.path().join("escape_beach.tsv").is_file());
        assert!(!temp_dir.path().parent().unwrap().join("escape_beach.json").exists());
    }
}
