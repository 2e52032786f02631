use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{TokenHolding, TokenTransfer, WalletAddress};
use crate::traits::balance_provider::BalanceProvider;
use crate::utils::helper::{spam_reason, wei_to_ether};

const NO_TRANSACTIONS: &str = "No transactions found";

/// Envelope shared by every Etherscan `module=account` answer
#[derive(Debug, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub result: serde_json::Value,
}

impl ExplorerResponse {
    fn is_ok(&self) -> bool {
        self.status == "1"
    }

    fn into_api_error(self) -> FetchError {
        let result = match self.result {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        FetchError::Api {
            message: self.message,
            result,
        }
    }
}

/// Etherscan-compatible block-explorer client
pub struct EtherscanProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl EtherscanProvider {
    /// Create a new block-explorer provider
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        request_delay: Duration,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            request_delay,
            last_request: Mutex::new(None),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.api_url.clone(),
            config.api_key.clone(),
            config.request_delay(),
        )
    }

    /// Sleep until `request_delay` has passed since the previous request
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<ExplorerResponse, FetchError> {
        self.throttle().await;

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("apikey", self.api_key.as_str()));

        let response = self.client.get(&self.api_url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::Status { status, body });
        }

        Ok(response.json::<ExplorerResponse>().await?)
    }
}

#[async_trait]
impl BalanceProvider for EtherscanProvider {
    async fn fetch_native_balance(&self, wallet: &WalletAddress) -> Result<f64, FetchError> {
        debug!("Requesting native balance for {}", wallet);
        let response = self
            .get(&[
                ("module", "account"),
                ("action", "balance"),
                ("address", wallet.as_str()),
                ("tag", "latest"),
            ])
            .await?;
        parse_native_balance(response)
    }

    async fn fetch_token_balances(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<TokenHolding>, FetchError> {
        debug!("Requesting token transfers for {}", wallet);
        let response = self
            .get(&[
                ("module", "account"),
                ("action", "tokentx"),
                ("address", wallet.as_str()),
                ("startblock", "0"),
                ("endblock", "999999999"),
                ("sort", "asc"),
            ])
            .await?;

        let transfers = parse_token_transfers(response)?;
        let holdings = fold_transfers(wallet.as_str(), &transfers);
        info!(
            "{}: {} transfers folded into {} tokens",
            wallet,
            transfers.len(),
            holdings.len()
        );
        Ok(holdings)
    }
}

/// Decode a `balance` answer into ether
pub fn parse_native_balance(response: ExplorerResponse) -> Result<f64, FetchError> {
    if !response.is_ok() {
        return Err(response.into_api_error());
    }

    let wei = match &response.result {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .ok_or_else(|| FetchError::Malformed(format!("balance result {}", response.result)))?;

    Ok(wei_to_ether(wei))
}

/// Decode a `tokentx` answer. "No transactions found" is an empty list.
pub fn parse_token_transfers(response: ExplorerResponse) -> Result<Vec<TokenTransfer>, FetchError> {
    if !response.is_ok() {
        if response.message == NO_TRANSACTIONS {
            return Ok(Vec::new());
        }
        return Err(response.into_api_error());
    }

    serde_json::from_value(response.result)
        .map_err(|e| FetchError::Malformed(format!("tokentx result: {}", e)))
}

/// Fold a transfer history into net holdings per token contract.
///
/// Incoming transfers add, outgoing transfers subtract, and transfers from
/// the wallet to itself leave the balance unchanged. Tokens with a spam-like
/// name are dropped. Holdings come back ordered by contract address.
pub fn fold_transfers(owner: &str, transfers: &[TokenTransfer]) -> Vec<TokenHolding> {
    let owner = owner.to_lowercase();
    let mut net: BTreeMap<String, (f64, &TokenTransfer)> = BTreeMap::new();

    for transfer in transfers {
        if let Some(reason) = spam_reason(&transfer.token_name) {
            debug!(
                "Token {} filtered out due to {}",
                transfer.token_name, reason
            );
            continue;
        }

        let incoming = transfer.to.to_lowercase() == owner;
        let outgoing = transfer.from.to_lowercase() == owner;
        let delta = match (incoming, outgoing) {
            (true, false) => transfer.raw_value(),
            (false, true) => -transfer.raw_value(),
            _ => 0.0,
        };

        let entry = net
            .entry(transfer.contract_address.to_lowercase())
            .or_insert((0.0, transfer));
        entry.0 += delta;
    }

    net.into_iter()
        .map(|(contract, (raw, first))| {
            TokenHolding::from_raw(
                &contract,
                first.token_symbol.clone(),
                first.token_name.clone(),
                raw,
                first.decimals(),
            )
        })
        .collect()
}
