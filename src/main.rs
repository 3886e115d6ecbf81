use clap::Parser;
use surf_forecast::core::output;
use surf_forecast::utils::error::{ErrorSeverity, ForecastError};
use surf_forecast::utils::{logger, validation::Validate};
use surf_forecast::{CliConfig, ForecastReport, ReqwestTransport, Spot, StormGlass};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting surf-forecast CLI");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            tracing::error!(
                "❌ Forecast failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2, // 可重試
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

async fn run(config: &CliConfig) -> Result<String, ForecastError> {
    let transport = match config.timeout() {
        Some(timeout) => ReqwestTransport::with_timeout(timeout),
        None => ReqwestTransport::new(),
    };
    let client = StormGlass::new(config.stormglass_config(), transport);

    let points = client.fetch_points(config.lat, config.lng).await?;
    tracing::info!("✅ Received {} forecast points", points.len());

    let spot = Spot::new(format!("{},{}", config.lat, config.lng), config.lat, config.lng);
    let report = ForecastReport::new(spot, config.source, points);
    output::render(&report, config.format)
}
