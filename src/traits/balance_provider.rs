use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{TokenHolding, WalletAddress};

/// Source of on-chain balances (a block-explorer API)
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Fetch the native balance of a wallet, in ether
    async fn fetch_native_balance(&self, wallet: &WalletAddress) -> Result<f64, FetchError>;

    /// Fetch the ERC-20 holdings of a wallet, before dust filtering
    async fn fetch_token_balances(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<TokenHolding>, FetchError>;
}
