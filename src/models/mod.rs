//! Data models for the balance checker

pub mod token;
pub mod wallet;
pub mod report;

// Re-export for convenience
pub use token::{TokenHolding, TokenTransfer};
pub use wallet::{BalanceRecord, WalletAddress};
pub use report::{PriceTable, Report, ReportRow, WalletSummary};
