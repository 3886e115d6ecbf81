use anyhow::Context;
use clap::Parser;
use surf_forecast::core::output::{self, OutputFormat};
use surf_forecast::domain::ports::{ConfigProvider, Storage};
use surf_forecast::utils::{logger, validation::Validate};
use surf_forecast::{
    fetch_spots, ForecastReport, LocalStorage, ReqwestTransport, SpotForecast, StormGlass,
    TomlConfig,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "batch-forecast")]
#[command(about = "Fetch forecasts for every spot listed in a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "forecast-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override fetch.concurrent_requests from config
    #[arg(long)]
    concurrent_requests: Option<usize>,
}

/// 依照每個輸出格式寫出一個檔案，回傳寫出的檔名
async fn write_outputs<S: Storage>(
    storage: &S,
    config: &TomlConfig,
    formats: &[OutputFormat],
    forecast: SpotForecast,
) -> anyhow::Result<Vec<String>> {
    let points = forecast.result?;
    let report = ForecastReport::new(forecast.spot, config.source(), points);
    Ok(output::write_report(storage, &report, formats).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = args.config;
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading configuration from: {}", config_path);
    let config = TomlConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load config file '{}'", config_path))?;
    config.validate().context("Configuration validation failed")?;

    let transport = match config.timeout() {
        Some(timeout) => ReqwestTransport::with_timeout(timeout),
        None => ReqwestTransport::new(),
    };
    let client = Arc::new(StormGlass::new(config.stormglass_config(), transport));
    let storage = LocalStorage::new(config.output.path.clone());
    let formats = config.output_formats()?;

    let concurrent_requests = args
        .concurrent_requests
        .unwrap_or_else(|| config.concurrent_requests());
    let forecasts = fetch_spots(client, config.spots.clone(), concurrent_requests).await;

    let mut failures = 0;
    for forecast in forecasts {
        let name = forecast.spot.name.clone();
        match write_outputs(&storage, &config, &formats, forecast).await {
            Ok(files) => tracing::info!("✅ {}: wrote {}", name, files.join(", ")),
            Err(e) => {
                failures += 1;
                tracing::error!("❌ {}: {:#}", name, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} spots failed", failures, config.spots.len());
    }
    Ok(())
}
