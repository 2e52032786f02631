use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::traits::price_provider::PriceProvider;

/// CoinGecko id of the native coin
pub const NATIVE_COIN_ID: &str = "ethereum";

/// CoinGecko asset platform the token contracts live on
pub const ASSET_PLATFORM: &str = "ethereum";

/// CoinGecko-compatible price provider with a run-scoped cache
pub struct CoinGeckoPriceProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    vs_currency: String,
    batch_size: usize,
    max_retries: u32,
    retry_delay: Duration,
    /// contract -> price; `None` caches an unknown price
    price_cache: Arc<DashMap<String, Option<f64>>>,
    native_price: OnceCell<Option<f64>>,
}

impl CoinGeckoPriceProvider {
    /// Create a new price provider
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            vs_currency: "usd".to_string(),
            batch_size: 1,
            max_retries: 5,
            retry_delay: Duration::from_secs(65),
            price_cache: Arc::new(DashMap::new()),
            native_price: OnceCell::new(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        let mut provider = Self::new(client, config.market_data_url.clone())
            .with_batch_size(config.price_batch_size)
            .with_retry(config.price_max_retries, config.price_retry_delay())
            .with_vs_currency(config.vs_currency.clone());
        provider.api_key = config
            .coingecko_api_key
            .clone()
            .filter(|key| !key.trim().is_empty());
        provider
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_retry(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_vs_currency(mut self, vs_currency: impl Into<String>) -> Self {
        self.vs_currency = vs_currency.into().to_lowercase();
        self
    }

    /// GET with retries on HTTP 429, doubling the delay each time
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut query: Vec<(&str, &str)> = params.to_vec();
        if let Some(key) = &self.api_key {
            query.push(("x_cg_demo_api_key", key.as_str()));
        }

        let mut delay = self.retry_delay;
        for attempt in 1..=self.max_retries {
            let response = self.client.get(&url).query(&query).send().await?;
            let status = response.status();
            debug!("Attempt {} for {}: HTTP status {}", attempt, path, status);

            if status.is_success() {
                return Ok(response.json::<serde_json::Value>().await?);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt < self.max_retries {
                    warn!("Rate limit hit, sleeping for {} seconds...", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                continue;
            }

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Err(FetchError::RateLimited {
            attempts: self.max_retries,
        })
    }

    /// Fetch prices for one batch of contracts
    async fn fetch_token_prices(
        &self,
        contracts: &[String],
    ) -> Result<HashMap<String, f64>, FetchError> {
        let joined = contracts.join(",");
        let path = format!("/simple/token_price/{}", ASSET_PLATFORM);
        let body = self
            .get_json(
                &path,
                &[
                    ("contract_addresses", joined.as_str()),
                    ("vs_currencies", self.vs_currency.as_str()),
                ],
            )
            .await?;
        Ok(parse_token_prices(&body, &self.vs_currency))
    }

    async fn fetch_native_price(&self) -> Result<Option<f64>, FetchError> {
        let body = self
            .get_json(
                "/simple/price",
                &[
                    ("ids", NATIVE_COIN_ID),
                    ("vs_currencies", self.vs_currency.as_str()),
                ],
            )
            .await?;
        Ok(body[NATIVE_COIN_ID][self.vs_currency.as_str()].as_f64())
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoPriceProvider {
    async fn get_token_price(&self, contract_address: &str) -> Option<f64> {
        self.get_batch_prices(&[contract_address.to_string()])
            .await
            .pop()
            .flatten()
    }

    async fn get_native_price(&self) -> Option<f64> {
        *self
            .native_price
            .get_or_init(|| async {
                match self.fetch_native_price().await {
                    Ok(price) => price,
                    Err(e) => {
                        warn!("Failed to fetch {} price: {}", NATIVE_COIN_ID, e);
                        None
                    }
                }
            })
            .await
    }

    async fn get_batch_prices(&self, contract_addresses: &[String]) -> Vec<Option<f64>> {
        let keys: Vec<String> = contract_addresses.iter().map(|c| c.to_lowercase()).collect();

        // Check cache first
        let mut to_fetch: Vec<String> = Vec::new();
        for key in &keys {
            if !self.price_cache.contains_key(key) && !to_fetch.contains(key) {
                to_fetch.push(key.clone());
            }
        }

        let total_batches = to_fetch.len().div_ceil(self.batch_size);
        for (i, batch) in to_fetch.chunks(self.batch_size).enumerate() {
            info!(
                "Fetching prices for {} contracts (batch {}/{})",
                batch.len(),
                i + 1,
                total_batches
            );
            match self.fetch_token_prices(batch).await {
                Ok(found) => {
                    for contract in batch {
                        let price = found.get(contract).copied();
                        if price.is_none() {
                            debug!("Price data not available for {}", contract);
                        }
                        self.price_cache.insert(contract.clone(), price);
                    }
                }
                Err(e) => {
                    warn!("Failed to fetch prices for {}: {}", batch.join(","), e);
                    for contract in batch {
                        self.price_cache.insert(contract.clone(), None);
                    }
                }
            }
        }

        keys.iter()
            .map(|key| self.price_cache.get(key).and_then(|price| *price))
            .collect()
    }
}

/// Extract `{contract: {currency: price}}` pairs, keyed by lowercased contract
pub fn parse_token_prices(body: &serde_json::Value, vs_currency: &str) -> HashMap<String, f64> {
    body.as_object()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(contract, quote)| {
                    quote[vs_currency]
                        .as_f64()
                        .map(|price| (contract.to_lowercase(), price))
                })
                .collect()
        })
        .unwrap_or_default()
}
