//! Zero Valuation - DCF valuation service for the Zero ecosystem.

use anyhow::Result;
use zero_common::config::Config;
use zero_common::config_loader::check_modular_files;
use zero_common::logging::init_logging_with_exclusions;
use zero_valuation::ValuationService;

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load and validate configuration (file + env overrides)
    let config = Config::load_and_validate()?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Zero Valuation v{}", env!("CARGO_PKG_VERSION"));

    for (file, present) in check_modular_files(None) {
        tracing::debug!(file = %file, present, "Config file");
    }

    let service = ValuationService::new(config);

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
