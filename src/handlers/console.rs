use async_trait::async_trait;
use tracing::info;

use crate::error::WriteError;
use crate::models::{Report, WalletSummary};
use crate::traits::report_sink::ReportSink;
use crate::utils::helper::truncate_string;

/// Console logging report sink
pub struct ConsoleReportSink {
    currency: String,
}

impl ConsoleReportSink {
    /// Create a new console sink
    pub fn new() -> Self {
        Self {
            currency: "USD".to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_uppercase();
        self
    }

    fn log_wallet(&self, index: usize, wallet: &WalletSummary) {
        let cur = &self.currency;
        let label = if wallet.label.is_empty() {
            String::new()
        } else {
            format!(" [{}]", wallet.label)
        };
        info!("{}. {}{}", index, wallet.wallet_address, label);
        match wallet.eth_value_usd {
            Some(value) => info!("   ETH: {:.8} ({:.2} {})", wallet.balance_ether, value, cur),
            None => info!("   ETH: {:.8} (price not available)", wallet.balance_ether),
        }
        info!("   Tokens: {:.2} {}", wallet.token_value_usd, cur);
        info!("   Total: {:.2} {}", wallet.total_value_usd, cur);
    }
}

impl Default for ConsoleReportSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSink for ConsoleReportSink {
    async fn write_report(&self, report: &Report) -> Result<(), WriteError> {
        let cur = &self.currency;
        info!("{}", "=".repeat(80));
        info!("WALLET BALANCES ({})", report.generated_at.format("%Y-%m-%d %H:%M:%S"));
        info!("{}", "-".repeat(80));

        for (i, wallet) in report.wallets.iter().enumerate() {
            self.log_wallet(i + 1, wallet);
            for row in report.wallet_rows(i) {
                let symbol = truncate_string(&row.token_symbol, 16);
                match (row.price_usd, row.value_usd) {
                    (Some(price), Some(value)) => info!(
                        "     {} {:.4} @ {:.6} = {:.2} {}",
                        symbol, row.amount, price, value, cur
                    ),
                    _ => info!("     {} {:.4} (price not available)", symbol, row.amount),
                }
            }
        }

        let total = report.total();
        info!("{}", "=".repeat(80));
        if let Some(price) = report.native_price {
            info!("Ethereum Price: {:.2} {}", price, cur);
        }
        info!("Total ETH: {:.8}", total.balance_ether);
        info!("Total Token Value: {:.2} {}", total.token_value_usd, cur);
        info!("➤ Total Value Across Wallets: {:.2} {}", total.total_value_usd, cur);
        info!("{}", "=".repeat(80));

        Ok(())
    }
}
