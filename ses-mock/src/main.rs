//! ses-mock: Mock email-sending API server

use ses_mock::api::ApiServer;
use ses_mock::metrics::SendMetrics;
use ses_mock::SesMockConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "ses-mock.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = if let Some(config_path) = std::env::args().nth(1) {
        SesMockConfig::from_file(Path::new(&config_path))?
    } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
        SesMockConfig::from_file(Path::new(DEFAULT_CONFIG_PATH))?
    } else {
        SesMockConfig::default()
    };

    if let Ok(addr) = std::env::var("SES_MOCK_LISTEN_ADDR") {
        config.server.listen_addr = addr;
    }

    // Initialize logging
    let default_filter = format!("ses_mock={},tower_http=info", config.logging.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ses-mock v{}", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", config.server.listen_addr);
    info!(
        "  Quota: {} per 24h, {} per second",
        config.quota.max_24_hour_send, config.quota.max_send_rate
    );
    info!(
        "  Warm-up: {} (day 1 limit {}, x{} per day)",
        if config.warmup.enabled { "on" } else { "off" },
        config.warmup.initial_daily_limit,
        config.warmup.increase_factor
    );

    let metrics = Arc::new(SendMetrics::new());
    let server = ApiServer::new(&config, metrics)?;
    server.run().await?;

    Ok(())
}
