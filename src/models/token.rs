use serde::Deserialize;

use crate::utils::helper::scale_amount;

/// Net ERC-20 balance of one wallet for one token contract
#[derive(Debug, Clone, PartialEq)]
pub struct TokenHolding {
    /// Lowercased contract address, used as the token key
    pub contract_address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    /// Amount in whole-token units
    pub amount: f64,
}

impl TokenHolding {
    /// Create a holding from a raw (base-unit) amount
    pub fn from_raw(
        contract_address: &str,
        symbol: impl Into<String>,
        name: impl Into<String>,
        raw_amount: f64,
        decimals: u32,
    ) -> Self {
        Self {
            contract_address: contract_address.to_lowercase(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
            amount: scale_amount(raw_amount, decimals),
        }
    }

    /// Format token amount with symbol
    pub fn formatted_amount(&self) -> String {
        format!("{:.8} {}", self.amount, self.symbol)
    }
}

/// One entry of the block explorer's `tokentx` listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub contract_address: String,
    pub from: String,
    pub to: String,
    /// Raw amount in base units, as a decimal string
    pub value: String,
    #[serde(default)]
    pub token_name: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub token_decimal: String,
}

impl TokenTransfer {
    /// Decimals of the token; an empty or garbled field counts as 0
    pub fn decimals(&self) -> u32 {
        self.token_decimal.trim().parse().unwrap_or(0)
    }

    /// Raw transferred amount; unparsable values count as 0
    pub fn raw_value(&self) -> f64 {
        self.value.trim().parse().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_scales_and_lowercases() {
        let holding = TokenHolding::from_raw("0xABCDEF", "USDC", "USD Coin", 2_500_000.0, 6);
        assert_eq!(holding.contract_address, "0xabcdef");
        assert_eq!(holding.amount, 2.5);
        assert_eq!(holding.formatted_amount(), "2.50000000 USDC");
    }

    #[test]
    fn test_transfer_deserialize() {
        let json = r#"{
            "blockNumber": "1",
            "contractAddress": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "from": "0x1",
            "to": "0x2",
            "value": "1000000",
            "tokenName": "USD Coin",
            "tokenSymbol": "USDC",
            "tokenDecimal": "6"
        }"#;
        let transfer: TokenTransfer = serde_json::from_str(json).unwrap();
        assert_eq!(transfer.token_symbol, "USDC");
        assert_eq!(transfer.decimals(), 6);
        assert_eq!(transfer.raw_value(), 1_000_000.0);
    }

    #[test]
    fn test_garbled_decimals_default_to_zero() {
        let json = r#"{"contractAddress": "0x1", "from": "a", "to": "b", "value": "x", "tokenDecimal": ""}"#;
        let transfer: TokenTransfer = serde_json::from_str(json).unwrap();
        assert_eq!(transfer.decimals(), 0);
        assert_eq!(transfer.raw_value(), 0.0);
    }
}
