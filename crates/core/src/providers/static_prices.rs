use async_trait::async_trait;
use std::collections::HashMap;

use super::traits::MarketDataProvider;
use crate::errors::DashboardError;
use crate::models::coin::{Coin, CoinQuote};
use crate::models::market::GlobalStats;

/// The baked-in fallback price table, by API coin id.
/// Also consulted when a holding is added for a coin the cached listing
/// doesn't know, so the portfolio shows a rough value before any fetch.
pub fn static_price(id: &str) -> Option<f64> {
    match id {
        "bitcoin" => Some(60_000.0),
        "ethereum" => Some(3_000.0),
        "binancecoin" => Some(500.0),
        "solana" => Some(150.0),
        "ripple" => Some(0.5),
        _ => None,
    }
}

/// Offline fallback provider over the static price table.
///
/// Registered behind the live API so that a portfolio of well-known coins
/// still values itself when the network is down. It only serves quotes:
/// market listings and global stats have no meaningful static equivalent
/// and are declined so the registry reports the live provider's error.
pub struct StaticPriceProvider;

impl StaticPriceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StaticPriceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for StaticPriceProvider {
    fn name(&self) -> &str {
        "StaticPrices"
    }

    async fn coin_markets(
        &self,
        _vs_currency: &str,
        _per_page: usize,
        _page: usize,
    ) -> Result<Vec<Coin>, DashboardError> {
        Err(DashboardError::Api {
            provider: "StaticPrices".into(),
            message: "static provider has no market listing".into(),
        })
    }

    async fn simple_prices(
        &self,
        ids: &[String],
        _vs_currency: &str,
    ) -> Result<HashMap<String, CoinQuote>, DashboardError> {
        let quotes: HashMap<String, CoinQuote> = ids
            .iter()
            .filter_map(|id| {
                static_price(id).map(|price| {
                    (
                        id.clone(),
                        CoinQuote {
                            price,
                            market_cap: None,
                            change_24h: None,
                        },
                    )
                })
            })
            .collect();

        if quotes.is_empty() && !ids.is_empty() {
            return Err(DashboardError::PriceNotAvailable {
                id: ids.join(","),
                currency: "static".into(),
            });
        }

        Ok(quotes)
    }

    async fn global_stats(&self, _vs_currency: &str) -> Result<GlobalStats, DashboardError> {
        Err(DashboardError::Api {
            provider: "StaticPrices".into(),
            message: "static provider has no global stats".into(),
        })
    }
}
