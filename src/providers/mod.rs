//! Block-explorer and market-data API clients

pub mod etherscan;
pub mod coingecko;

// Re-export for convenience
pub use etherscan::EtherscanProvider;
pub use coingecko::CoinGeckoPriceProvider;
