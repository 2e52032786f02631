#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use eth_balance_checker::{BalanceProvider, FetchError, PriceProvider, TokenHolding, WalletAddress};

pub const ADDR_A: &str = "0x1111111111111111111111111111111111111111";
pub const ADDR_B: &str = "0x2222222222222222222222222222222222222222";
pub const ADDR_C: &str = "0x3333333333333333333333333333333333333333";
pub const TOKEN_X: &str = "0x00000000000000000000000000000000000000a1";
pub const TOKEN_Y: &str = "0x00000000000000000000000000000000000000b2";

/// Shared, ordered record of provider calls
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn holding(contract: &str, symbol: &str, amount: f64) -> TokenHolding {
    TokenHolding {
        contract_address: contract.to_string(),
        symbol: symbol.to_string(),
        name: format!("{symbol} Token"),
        decimals: 18,
        amount,
    }
}

/// In-memory block explorer. Wallets without an entry fail.
#[derive(Default)]
pub struct FakeBalanceProvider {
    pub wallets: HashMap<String, (f64, Vec<TokenHolding>)>,
    pub calls: CallLog,
}

impl FakeBalanceProvider {
    pub fn with_wallet(mut self, address: &str, native: f64, tokens: Vec<TokenHolding>) -> Self {
        self.wallets.insert(address.to_string(), (native, tokens));
        self
    }

    pub fn with_log(mut self, calls: CallLog) -> Self {
        self.calls = calls;
        self
    }

    fn lookup(&self, wallet: &WalletAddress) -> Result<&(f64, Vec<TokenHolding>), FetchError> {
        self.wallets.get(wallet.as_str()).ok_or_else(|| FetchError::Api {
            message: "NOTOK".to_string(),
            result: "Max rate limit reached".to_string(),
        })
    }
}

#[async_trait]
impl BalanceProvider for FakeBalanceProvider {
    async fn fetch_native_balance(&self, wallet: &WalletAddress) -> Result<f64, FetchError> {
        self.calls.lock().unwrap().push(format!("balance:{}", wallet));
        Ok(self.lookup(wallet)?.0)
    }

    async fn fetch_token_balances(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<TokenHolding>, FetchError> {
        self.calls.lock().unwrap().push(format!("tokens:{}", wallet));
        Ok(self.lookup(wallet)?.1.clone())
    }
}

/// In-memory market data. Contracts without an entry are unknown.
#[derive(Default)]
pub struct FakePriceProvider {
    pub native: Option<f64>,
    pub prices: HashMap<String, f64>,
    pub calls: CallLog,
}

impl FakePriceProvider {
    pub fn with_native(mut self, price: f64) -> Self {
        self.native = Some(price);
        self
    }

    pub fn with_price(mut self, contract: &str, price: f64) -> Self {
        self.prices.insert(contract.to_lowercase(), price);
        self
    }

    pub fn with_log(mut self, calls: CallLog) -> Self {
        self.calls = calls;
        self
    }
}

#[async_trait]
impl PriceProvider for FakePriceProvider {
    async fn get_token_price(&self, contract_address: &str) -> Option<f64> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("price:{}", contract_address));
        self.prices.get(&contract_address.to_lowercase()).copied()
    }

    async fn get_native_price(&self) -> Option<f64> {
        self.calls.lock().unwrap().push("native_price".to_string());
        self.native
    }
}
