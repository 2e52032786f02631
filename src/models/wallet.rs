use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::token::TokenHolding;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid address regex"));

/// Wallet address as read from the input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAddress {
    pub address: String,
    /// Free-form label from the optional `hardwarewallet` column
    pub label: Option<String>,
}

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.is_empty() { None } else { Some(label) };
        self
    }

    /// Check the `0x` + 40 hex digits format
    pub fn is_valid(&self) -> bool {
        ADDRESS_RE.is_match(&self.address)
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Native and token balances of one wallet, fetched once per run
#[derive(Debug, Clone)]
pub struct BalanceRecord {
    pub wallet: WalletAddress,
    /// Native balance in ether
    pub native_balance: f64,
    pub tokens: Vec<TokenHolding>,
}

impl BalanceRecord {
    pub fn new(wallet: WalletAddress, native_balance: f64, tokens: Vec<TokenHolding>) -> Self {
        Self {
            wallet,
            native_balance,
            tokens,
        }
    }

    /// Number of token holdings
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        assert!(WalletAddress::new("0xde0B295669a9FD93d5F28D9Ec85E40f4cb697BAe").is_valid());
        assert!(!WalletAddress::new("de0B295669a9FD93d5F28D9Ec85E40f4cb697BAe").is_valid());
        assert!(!WalletAddress::new("0xde0B295669a9FD93d5F28D9Ec85E40f4cb697BA").is_valid());
        assert!(!WalletAddress::new("0xzz0B295669a9FD93d5F28D9Ec85E40f4cb697BAe").is_valid());
    }

    #[test]
    fn test_empty_label_is_none() {
        let wallet = WalletAddress::new("0x1").with_label("");
        assert_eq!(wallet.label, None);
        let wallet = WalletAddress::new("0x1").with_label("ledger");
        assert_eq!(wallet.label.as_deref(), Some("ledger"));
    }
}
