use async_trait::async_trait;

/// Trait for price feed providers
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Get the price of a token contract, `None` when unknown
    async fn get_token_price(&self, contract_address: &str) -> Option<f64>;

    /// Get the native coin price
    async fn get_native_price(&self) -> Option<f64>;

    /// Get prices for multiple contracts, in input order
    async fn get_batch_prices(&self, contract_addresses: &[String]) -> Vec<Option<f64>> {
        let mut prices = Vec::with_capacity(contract_addresses.len());
        for contract in contract_addresses {
            prices.push(self.get_token_price(contract).await);
        }
        prices
    }
}
