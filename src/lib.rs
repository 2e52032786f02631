//! Ethereum Balance Checker Library
//!
//! Fetches native and ERC-20 balances for a list of wallets from an
//! Etherscan-compatible API, prices the tokens through CoinGecko and writes
//! the result as two timestamped CSV reports.

use std::sync::Arc;

// Public modules - these are the API surface
pub mod address_source;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod tracker;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use address_source::read_addresses;
pub use config::Config;
pub use error::{BalanceCheckerError, ConfigError, FetchError, InputError, WriteError};
pub use models::{
    token::{TokenHolding, TokenTransfer},
    wallet::{BalanceRecord, WalletAddress},
    report::{PriceTable, Report, ReportRow, WalletSummary},
};
pub use traits::{
    balance_provider::BalanceProvider,
    price_provider::PriceProvider,
    report_sink::ReportSink,
};
pub use providers::{
    etherscan::EtherscanProvider,
    coingecko::CoinGeckoPriceProvider,
};
pub use handlers::{
    console::ConsoleReportSink,
    csv_writer::CsvReportWriter,
    composite::CompositeReportSink,
};
pub use tracker::balance_checker::BalanceChecker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP timeout applied to every API request
pub const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, BalanceCheckerError>;

/// Wire the configured providers and sinks into a checker
pub fn build_checker(config: &Config) -> Result<BalanceChecker> {
    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let balance_provider = Arc::new(EtherscanProvider::from_config(client.clone(), config));
    let price_provider = Arc::new(CoinGeckoPriceProvider::from_config(client, config));

    let mut sink = CompositeReportSink::new();
    sink.add_sink(Arc::new(
        ConsoleReportSink::new().with_currency(config.vs_currency.clone()),
    ));
    sink.add_sink(Arc::new(
        CsvReportWriter::new(config.output_dir.clone()).with_currency(config.vs_currency.clone()),
    ));

    Ok(BalanceChecker::new(balance_provider, price_provider, Arc::new(sink))
        .with_dust_threshold(config.dust_threshold))
}

/// Run the whole pipeline: addresses, balances, prices, report
pub async fn run(config: &Config) -> Result<Report> {
    let wallets = read_addresses(&config.filename)?;
    let checker = build_checker(config)?;
    Ok(checker.run(&wallets).await?)
}
