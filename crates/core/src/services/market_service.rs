use std::collections::HashMap;
use tracing::warn;

use crate::errors::DashboardError;
use crate::models::coin::{Coin, CoinQuote};
use crate::models::market::GlobalStats;
use crate::providers::registry::ProviderRegistry;
use crate::providers::traits::MarketDataProvider;

/// Coins requested per listing page.
pub const DEFAULT_PER_PAGE: usize = 200;

/// Maximum listing pages per refresh.
pub const MAX_MARKET_PAGES: usize = 10;

/// Coins shown for an empty search query.
pub const TOP_COINS_SHOWN: usize = 10;

/// Fetches market data from API providers with automatic fallback,
/// and filters the cached listing for search.
///
/// Providers are tried in registration order. If the live API fails
/// (down, rate limited), the next provider gets a chance; the last error
/// surfaces when all of them fail.
pub struct MarketService {
    registry: ProviderRegistry,
}

impl MarketService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of all registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry
            .providers()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Fetch up to `pages` pages of the coin listing, concatenated.
    /// Stops early when a page comes back short (end of the listing).
    pub async fn coin_markets(
        &self,
        vs_currency: &str,
        pages: usize,
    ) -> Result<Vec<Coin>, DashboardError> {
        if pages == 0 || pages > MAX_MARKET_PAGES {
            return Err(DashboardError::ValidationError(format!(
                "Page count {pages} out of range (expected 1..={MAX_MARKET_PAGES})"
            )));
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(DashboardError::NoProvider("coin markets".into()));
        }

        let mut last_error = None;
        for provider in providers {
            match Self::fetch_listing(provider, vs_currency, pages).await {
                Ok(coins) => return Ok(coins),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "markets fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::NoProvider("coin markets".into())))
    }

    async fn fetch_listing(
        provider: &dyn MarketDataProvider,
        vs_currency: &str,
        pages: usize,
    ) -> Result<Vec<Coin>, DashboardError> {
        let mut all = Vec::new();
        for page in 1..=pages {
            let batch = provider
                .coin_markets(vs_currency, DEFAULT_PER_PAGE, page)
                .await?;
            let short_page = batch.len() < DEFAULT_PER_PAGE;
            all.extend(batch);
            if short_page {
                break;
            }
        }
        Ok(all)
    }

    /// Batched current quotes for a set of coin ids, with fallback.
    /// The returned map may be partial: ids unknown upstream are absent
    /// and the caller leaves those holdings untouched.
    pub async fn quotes(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<HashMap<String, CoinQuote>, DashboardError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(DashboardError::NoProvider("simple prices".into()));
        }

        let mut last_error = None;
        for provider in providers {
            match provider.simple_prices(ids, vs_currency).await {
                Ok(quotes) => return Ok(quotes),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "quote fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::NoProvider("simple prices".into())))
    }

    /// Global market statistics, with fallback.
    pub async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, DashboardError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(DashboardError::NoProvider("global stats".into()));
        }

        let mut last_error = None;
        for provider in providers {
            match provider.global_stats(vs_currency).await {
                Ok(stats) => return Ok(stats),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "global stats fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::NoProvider("global stats".into())))
    }

    /// Filter a cached listing by a search query, case-insensitive on
    /// name and symbol. An empty or whitespace query returns the top
    /// coins (the listing is already market-cap ordered); no match
    /// returns an empty list.
    pub fn search<'a>(&self, coins: &'a [Coin], query: &str) -> Vec<&'a Coin> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return coins.iter().take(TOP_COINS_SHOWN).collect();
        }

        let needle = trimmed.to_lowercase();
        coins.iter().filter(|c| c.matches(&needle)).collect()
    }
}
