use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use super::traits::MarketDataProvider;
use crate::errors::DashboardError;
use crate::models::coin::{Coin, CoinQuote};
use crate::models::market::GlobalStats;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API provider.
///
/// - **Free**: no API key, no authentication.
/// - **Endpoints**: `/coins/markets` (listing), `/simple/price` (batched
///   quotes with market cap and 24h change), `/global` (market totals).
///
/// CoinGecko identifies coins by lowercase slug ids ("bitcoin",
/// "bitcoin-cash"); the markets listing carries the authoritative ids and
/// user-entered names are slugified to match.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

/// `/simple/price` returns `{ "<id>": { "<vs>": 1.0, "<vs>_market_cap": ... } }`
/// with dynamic keys, so it lands in nested maps before conversion.
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Deserialize)]
struct GlobalData {
    active_cryptocurrencies: Option<u64>,
    total_market_cap: HashMap<String, f64>,
    total_volume: HashMap<String, f64>,
    market_cap_percentage: HashMap<String, f64>,
    market_cap_change_percentage_24h_usd: Option<f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn coin_markets(
        &self,
        vs_currency: &str,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<Coin>, DashboardError> {
        let url = format!(
            "{BASE_URL}/coins/markets?vs_currency={vs_currency}&order=market_cap_desc\
             &per_page={per_page}&page={page}&sparkline=false"
        );
        debug!(page, per_page, "fetching coin markets");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DashboardError::Api {
                provider: "CoinGecko".into(),
                message: format!("markets request failed with status {}", resp.status()),
            });
        }

        let coins: Vec<Coin> = resp.json().await.map_err(|e| DashboardError::Api {
            provider: "CoinGecko".into(),
            message: format!("failed to parse markets page {page}: {e}"),
        })?;

        Ok(coins)
    }

    async fn simple_prices(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<HashMap<String, CoinQuote>, DashboardError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = ids.join(",");
        let url = format!(
            "{BASE_URL}/simple/price?ids={joined}&vs_currencies={vs_currency}\
             &include_market_cap=true&include_24hr_change=true"
        );
        debug!(ids = ids.len(), "fetching simple prices");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DashboardError::Api {
                provider: "CoinGecko".into(),
                message: format!("simple price request failed with status {}", resp.status()),
            });
        }

        let raw: SimplePriceResponse = resp.json().await.map_err(|e| DashboardError::Api {
            provider: "CoinGecko".into(),
            message: format!("failed to parse simple price response: {e}"),
        })?;

        let cap_key = format!("{vs_currency}_market_cap");
        let change_key = format!("{vs_currency}_24h_change");

        let mut quotes = HashMap::with_capacity(raw.len());
        for (id, fields) in raw {
            // Unknown ids come back as empty objects; skip anything unpriced.
            let Some(&price) = fields.get(vs_currency) else {
                continue;
            };
            quotes.insert(
                id,
                CoinQuote {
                    price,
                    market_cap: fields.get(&cap_key).copied(),
                    change_24h: fields.get(&change_key).copied(),
                },
            );
        }

        Ok(quotes)
    }

    async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, DashboardError> {
        let url = format!("{BASE_URL}/global");
        debug!("fetching global stats");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DashboardError::Api {
                provider: "CoinGecko".into(),
                message: format!("global stats request failed with status {}", resp.status()),
            });
        }

        let global: GlobalResponse = resp.json().await.map_err(|e| DashboardError::Api {
            provider: "CoinGecko".into(),
            message: format!("failed to parse global stats: {e}"),
        })?;

        let data = global.data;
        let total_market_cap =
            data.total_market_cap
                .get(vs_currency)
                .copied()
                .ok_or_else(|| DashboardError::Api {
                    provider: "CoinGecko".into(),
                    message: format!("global stats carry no total market cap in {vs_currency}"),
                })?;
        let total_volume = data
            .total_volume
            .get(vs_currency)
            .copied()
            .ok_or_else(|| DashboardError::Api {
                provider: "CoinGecko".into(),
                message: format!("global stats carry no total volume in {vs_currency}"),
            })?;

        Ok(GlobalStats {
            currency: vs_currency.to_string(),
            total_market_cap,
            total_volume,
            market_cap_change_24h_pct: data.market_cap_change_percentage_24h_usd,
            btc_dominance_pct: data.market_cap_percentage.get("btc").copied(),
            active_cryptocurrencies: data.active_cryptocurrencies,
        })
    }
}
