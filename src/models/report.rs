use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::wallet::BalanceRecord;

/// Unit prices resolved for one run. `None` means the price is unknown.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    native: Option<f64>,
    tokens: HashMap<String, Option<f64>>,
}

impl PriceTable {
    pub fn new(native: Option<f64>) -> Self {
        Self {
            native,
            tokens: HashMap::new(),
        }
    }

    pub fn insert(&mut self, contract_address: &str, price: Option<f64>) {
        self.tokens.insert(contract_address.to_lowercase(), price);
    }

    pub fn native_price(&self) -> Option<f64> {
        self.native
    }

    /// Price of a token contract, case-insensitive
    pub fn token_price(&self, contract_address: &str) -> Option<f64> {
        self.tokens
            .get(&contract_address.to_lowercase())
            .copied()
            .flatten()
    }

    /// Number of contracts whose price is unknown
    pub fn unknown_count(&self) -> usize {
        self.tokens.values().filter(|p| p.is_none()).count()
    }
}

/// One line of `token_data_<timestamp>.csv`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub wallet_address: String,
    pub token_symbol: String,
    pub token_name: String,
    pub contract_address: String,
    pub amount: f64,
    pub price_usd: Option<f64>,
    pub value_usd: Option<f64>,
}

/// One line of `wallet_balances_<timestamp>.csv`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletSummary {
    pub wallet_address: String,
    pub label: String,
    pub balance_ether: f64,
    pub eth_price_usd: Option<f64>,
    pub eth_value_usd: Option<f64>,
    pub token_value_usd: f64,
    pub total_value_usd: f64,
}

/// Balances joined with prices, ready to be written
#[derive(Debug, Clone)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub wallets: Vec<WalletSummary>,
    pub rows: Vec<ReportRow>,
    pub native_price: Option<f64>,
    /// `rows` range of each entry in `wallets`
    row_ranges: Vec<Range<usize>>,
}

impl Report {
    /// Join balance records with prices. Wallet order follows `records`.
    pub fn build(
        records: &[BalanceRecord],
        prices: &PriceTable,
        generated_at: DateTime<Local>,
    ) -> Self {
        let native_price = prices.native_price();
        let mut wallets = Vec::with_capacity(records.len());
        let mut rows = Vec::new();
        let mut row_ranges = Vec::with_capacity(records.len());

        for record in records {
            let mut wallet_rows: Vec<ReportRow> = record
                .tokens
                .iter()
                .map(|holding| {
                    let price = prices.token_price(&holding.contract_address);
                    ReportRow {
                        wallet_address: record.wallet.address.clone(),
                        token_symbol: holding.symbol.clone(),
                        token_name: holding.name.clone(),
                        contract_address: holding.contract_address.clone(),
                        amount: holding.amount,
                        price_usd: price,
                        value_usd: price.map(|p| holding.amount * p),
                    }
                })
                .collect();

            wallet_rows.sort_by(compare_rows);

            let token_value: f64 = wallet_rows.iter().filter_map(|r| r.value_usd).sum();
            let eth_value = native_price.map(|p| record.native_balance * p);

            wallets.push(WalletSummary {
                wallet_address: record.wallet.address.clone(),
                label: record.wallet.label.clone().unwrap_or_default(),
                balance_ether: record.native_balance,
                eth_price_usd: native_price,
                eth_value_usd: eth_value,
                token_value_usd: token_value,
                total_value_usd: eth_value.unwrap_or(0.0) + token_value,
            });
            let start = rows.len();
            rows.extend(wallet_rows);
            row_ranges.push(start..rows.len());
        }

        Self {
            generated_at,
            wallets,
            rows,
            native_price,
            row_ranges,
        }
    }

    /// Token rows of the wallet at `index` in `wallets`
    pub fn wallet_rows(&self, index: usize) -> &[ReportRow] {
        self.row_ranges
            .get(index)
            .map(|range| &self.rows[range.clone()])
            .unwrap_or_default()
    }

    /// Sum of all wallets, written as the last line of the wallet report
    pub fn total(&self) -> WalletSummary {
        let balance_ether: f64 = self.wallets.iter().map(|w| w.balance_ether).sum();
        WalletSummary {
            wallet_address: "Total".to_string(),
            label: String::new(),
            balance_ether,
            eth_price_usd: self.native_price,
            eth_value_usd: self.native_price.map(|p| balance_ether * p),
            token_value_usd: self.wallets.iter().map(|w| w.token_value_usd).sum(),
            total_value_usd: self.wallets.iter().map(|w| w.total_value_usd).sum(),
        }
    }

    /// Timestamp embedded in the output file names
    pub fn file_timestamp(&self) -> String {
        self.generated_at.format("%Y%m%d_%H%M%S").to_string()
    }
}

// Value descending, unknown values last, then contract address.
fn compare_rows(a: &ReportRow, b: &ReportRow) -> Ordering {
    let by_value = match (a.value_usd, b.value_usd) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_value.then_with(|| a.contract_address.cmp(&b.contract_address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TokenHolding, WalletAddress};
    use chrono::TimeZone;

    fn holding(contract: &str, symbol: &str, amount: f64) -> TokenHolding {
        TokenHolding {
            contract_address: contract.to_string(),
            symbol: symbol.to_string(),
            name: format!("{symbol} token"),
            decimals: 18,
            amount,
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()
    }

    #[test]
    fn test_value_is_amount_times_price() {
        let records = vec![BalanceRecord::new(
            WalletAddress::new("0xaa"),
            1.5,
            vec![holding("0xt1", "AAA", 100.0), holding("0xt2", "BBB", 3.0)],
        )];
        let mut prices = PriceTable::new(Some(2000.0));
        prices.insert("0xT1", Some(2.0));
        prices.insert("0xt2", None);

        let report = Report::build(&records, &prices, fixed_time());

        assert_eq!(report.rows.len(), 2);
        let priced = &report.rows[0];
        assert_eq!(priced.token_symbol, "AAA");
        assert_eq!(priced.value_usd, Some(200.0));
        let unknown = &report.rows[1];
        assert_eq!(unknown.price_usd, None);
        assert_eq!(unknown.value_usd, None);

        let wallet = &report.wallets[0];
        assert_eq!(wallet.eth_value_usd, Some(3000.0));
        assert_eq!(wallet.token_value_usd, 200.0);
        assert_eq!(wallet.total_value_usd, 3200.0);
    }

    #[test]
    fn test_rows_sorted_by_value_within_wallet() {
        let records = vec![
            BalanceRecord::new(
                WalletAddress::new("0xaa"),
                0.0,
                vec![
                    holding("0xc", "C", 1.0),
                    holding("0xa", "A", 1.0),
                    holding("0xb", "B", 1.0),
                ],
            ),
            BalanceRecord::new(WalletAddress::new("0xbb"), 0.0, vec![holding("0xa", "A", 5.0)]),
        ];
        let mut prices = PriceTable::new(None);
        prices.insert("0xa", Some(1.0));
        prices.insert("0xb", Some(10.0));

        let report = Report::build(&records, &prices, fixed_time());
        let order: Vec<(&str, &str)> = report
            .rows
            .iter()
            .map(|r| (r.wallet_address.as_str(), r.token_symbol.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("0xaa", "B"), ("0xaa", "A"), ("0xaa", "C"), ("0xbb", "A")]
        );
    }

    #[test]
    fn test_duplicate_wallets_keep_their_own_rows() {
        let records = vec![
            BalanceRecord::new(WalletAddress::new("0xaa"), 0.0, vec![holding("0xa", "A", 1.0)]),
            BalanceRecord::new(WalletAddress::new("0xbb"), 0.0, vec![]),
            BalanceRecord::new(
                WalletAddress::new("0xaa"),
                0.0,
                vec![holding("0xb", "B", 2.0), holding("0xc", "C", 3.0)],
            ),
        ];
        let report = Report::build(&records, &PriceTable::new(None), fixed_time());

        let symbols = |index: usize| -> Vec<&str> {
            report
                .wallet_rows(index)
                .iter()
                .map(|r| r.token_symbol.as_str())
                .collect()
        };
        assert_eq!(symbols(0), vec!["A"]);
        assert!(symbols(1).is_empty());
        assert_eq!(symbols(2), vec!["B", "C"]);
    }

    #[test]
    fn test_total_without_native_price() {
        let records = vec![
            BalanceRecord::new(WalletAddress::new("0xaa"), 1.0, vec![]),
            BalanceRecord::new(WalletAddress::new("0xbb"), 2.5, vec![]),
        ];
        let report = Report::build(&records, &PriceTable::new(None), fixed_time());
        let total = report.total();

        assert_eq!(total.wallet_address, "Total");
        assert_eq!(total.balance_ether, 3.5);
        assert_eq!(total.eth_value_usd, None);
        assert_eq!(total.total_value_usd, 0.0);
    }

    #[test]
    fn test_file_timestamp_format() {
        let report = Report::build(&[], &PriceTable::default(), fixed_time());
        assert_eq!(report.file_timestamp(), "20240305_070809");
        assert!(report.wallets.is_empty());
        assert!(report.wallet_rows(0).is_empty());
    }
}
