use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::error::WriteError;
use crate::models::Report;
use crate::traits::report_sink::ReportSink;

pub const WALLET_HEADERS: [&str; 7] = [
    "wallet_address",
    "label",
    "balance_ether",
    "eth_price_usd",
    "eth_value_usd",
    "token_value_usd",
    "total_value_usd",
];

pub const TOKEN_HEADERS: [&str; 7] = [
    "wallet_address",
    "token_symbol",
    "token_name",
    "contract_address",
    "amount",
    "price_usd",
    "value_usd",
];

/// Writes `wallet_balances_<ts>.csv` and `token_data_<ts>.csv`
pub struct CsvReportWriter {
    output_dir: PathBuf,
    currency: String,
}

impl CsvReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            currency: "usd".to_string(),
        }
    }

    /// Currency the price columns are named after
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_lowercase();
        self
    }

    pub fn wallet_balances_path(&self, report: &Report) -> PathBuf {
        self.output_dir
            .join(format!("wallet_balances_{}.csv", report.file_timestamp()))
    }

    pub fn token_data_path(&self, report: &Report) -> PathBuf {
        self.output_dir
            .join(format!("token_data_{}.csv", report.file_timestamp()))
    }
}

/// Rename the `_usd` columns after `currency`
pub fn currency_headers(headers: &[&str], currency: &str) -> Vec<String> {
    headers
        .iter()
        .map(|header| match header.strip_suffix("_usd") {
            Some(stem) => format!("{}_{}", stem, currency),
            None => header.to_string(),
        })
        .collect()
}

fn write_csv<'a, T, I>(path: &Path, headers: &[String], rows: I) -> Result<(), WriteError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let csv_err = |source: csv::Error| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(headers).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl ReportSink for CsvReportWriter {
    async fn write_report(&self, report: &Report) -> Result<(), WriteError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let wallet_path = self.wallet_balances_path(report);
        let total = report.total();
        write_csv(
            &wallet_path,
            &currency_headers(&WALLET_HEADERS, &self.currency),
            report.wallets.iter().chain(std::iter::once(&total)),
        )?;
        info!("Data saved to {}", wallet_path.display());

        let token_path = self.token_data_path(report);
        write_csv(
            &token_path,
            &currency_headers(&TOKEN_HEADERS, &self.currency),
            &report.rows,
        )?;
        info!("Data saved to {}", token_path.display());

        Ok(())
    }
}
