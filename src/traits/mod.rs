//! Core traits for the balance checker

pub mod balance_provider;
pub mod price_provider;
pub mod report_sink;

// Re-export for convenience
pub use balance_provider::BalanceProvider;
pub use price_provider::PriceProvider;
pub use report_sink::ReportSink;
