use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eth_balance_checker::Config;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .init();

    let config_path = Config::path_from_env();
    info!("Loading configuration from {}", config_path.display());

    let config = Config::from_file(&config_path).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let report = runtime
        .block_on(eth_balance_checker::run(&config))
        .map_err(|e| {
            error!("{}", e);
            e
        })?;

    info!(
        "Done: {} wallets, {} token rows",
        report.wallets.len(),
        report.rows.len()
    );
    Ok(())
}
