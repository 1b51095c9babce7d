use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::DashboardError;
use crate::models::coin::{Coin, CoinQuote};
use crate::models::market::GlobalStats;

/// Trait abstraction for market-data providers.
///
/// The live API implements all three operations; the static-price
/// fallback only serves quotes. If the upstream API changes or goes away,
/// only one implementation is replaced — the rest of the codebase is
/// untouched, and tests substitute a mock.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// One page of the coin listing, ordered by market cap descending.
    /// `page` is 1-based.
    async fn coin_markets(
        &self,
        vs_currency: &str,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<Coin>, DashboardError>;

    /// Batched current quotes for a set of coin ids.
    /// Ids missing upstream are simply absent from the returned map.
    async fn simple_prices(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<HashMap<String, CoinQuote>, DashboardError>;

    /// Global market statistics.
    async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, DashboardError>;
}
