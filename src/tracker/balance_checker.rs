use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::error::{FetchError, WriteError};
use crate::models::{BalanceRecord, PriceTable, Report, WalletAddress};
use crate::traits::{
    balance_provider::BalanceProvider,
    price_provider::PriceProvider,
    report_sink::ReportSink,
};

/// Runs one fetch-price-report pass over a list of wallets
pub struct BalanceChecker {
    balance_provider: Arc<dyn BalanceProvider>,
    price_provider: Arc<dyn PriceProvider>,
    report_sink: Arc<dyn ReportSink>,
    dust_threshold: f64,
}

impl BalanceChecker {
    /// Create a new balance checker
    pub fn new(
        balance_provider: Arc<dyn BalanceProvider>,
        price_provider: Arc<dyn PriceProvider>,
        report_sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            balance_provider,
            price_provider,
            report_sink,
            dust_threshold: 0.01,
        }
    }

    /// Holdings below `dust_threshold` are left out of the report
    pub fn with_dust_threshold(mut self, dust_threshold: f64) -> Self {
        self.dust_threshold = dust_threshold;
        self
    }

    /// Fetch, price and write a report stamped with the current time
    pub async fn run(&self, wallets: &[WalletAddress]) -> Result<Report, WriteError> {
        self.run_at(wallets, Local::now()).await
    }

    /// Fetch, price and write a report stamped with `generated_at`
    pub async fn run_at(
        &self,
        wallets: &[WalletAddress],
        generated_at: DateTime<Local>,
    ) -> Result<Report, WriteError> {
        info!("Starting to retrieve balances for {} wallet addresses...", wallets.len());
        let records = self.fetch_balances(wallets).await;

        let prices = self.fetch_prices(&records).await;

        let report = Report::build(&records, &prices, generated_at);
        self.report_sink.write_report(&report).await?;
        Ok(report)
    }

    /// Fetch balances of every wallet. Failed wallets are logged and left out.
    pub async fn fetch_balances(&self, wallets: &[WalletAddress]) -> Vec<BalanceRecord> {
        let mut records = Vec::with_capacity(wallets.len());

        for (i, wallet) in wallets.iter().enumerate() {
            info!("Processing {}/{}: {}", i + 1, wallets.len(), wallet);
            match self.fetch_balance(wallet).await {
                Ok(record) => {
                    info!(
                        "Balance for {}: {} Ether, {} tokens",
                        wallet,
                        record.native_balance,
                        record.token_count()
                    );
                    records.push(record);
                }
                Err(e) => warn!("Skipping {}: {}", wallet, e),
            }
        }

        let skipped = wallets.len() - records.len();
        if skipped > 0 {
            warn!("{} of {} addresses were skipped", skipped, wallets.len());
        }
        records
    }

    async fn fetch_balance(&self, wallet: &WalletAddress) -> Result<BalanceRecord, FetchError> {
        if !wallet.is_valid() {
            return Err(FetchError::InvalidAddress(wallet.address.clone()));
        }

        let native_balance = self.balance_provider.fetch_native_balance(wallet).await?;
        let mut tokens = self.balance_provider.fetch_token_balances(wallet).await?;

        let before = tokens.len();
        tokens.retain(|holding| holding.amount >= self.dust_threshold);
        if tokens.len() < before {
            info!(
                "Filtered out {} tokens with a balance < {}",
                before - tokens.len(),
                self.dust_threshold
            );
        }
        for holding in &tokens {
            debug!("  {} ({})", holding.formatted_amount(), holding.contract_address);
        }

        Ok(BalanceRecord::new(wallet.clone(), native_balance, tokens))
    }

    /// Resolve the native price and the price of every distinct token contract
    pub async fn fetch_prices(&self, records: &[BalanceRecord]) -> PriceTable {
        let native_price = self.price_provider.get_native_price().await;
        match native_price {
            Some(price) => info!("Current Ethereum price: ${:.2}", price),
            None => warn!("Ethereum price not available"),
        }

        let mut seen = HashSet::new();
        let contracts: Vec<String> = records
            .iter()
            .flat_map(|record| record.tokens.iter())
            .map(|holding| holding.contract_address.to_lowercase())
            .filter(|contract| seen.insert(contract.clone()))
            .collect();

        let mut table = PriceTable::new(native_price);
        if contracts.is_empty() {
            return table;
        }

        info!("Fetching prices for {} distinct tokens", contracts.len());
        let prices = self.price_provider.get_batch_prices(&contracts).await;
        for (contract, price) in contracts.iter().zip(prices) {
            table.insert(contract, price);
        }

        let unknown = table.unknown_count();
        if unknown > 0 {
            warn!("Price data not available for {} tokens", unknown);
        }
        info!("Completed fetching prices for all tokens.");
        table
    }
}
