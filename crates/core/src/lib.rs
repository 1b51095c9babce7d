pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use models::analytics::PortfolioSummary;
use models::coin::{slugify, Coin, CoinQuote};
use models::comparison::{CoinSnapshot, ComparisonSelection, MarketCapComparison, SelectedCoin};
use models::holding::Holding;
use models::market::GlobalStats;
use models::portfolio::Portfolio;
use models::settings::Theme;
use providers::registry::ProviderRegistry;
use providers::static_prices::static_price;
use services::{
    comparison_service::ComparisonService, market_service::MarketService,
    portfolio_service::PortfolioService,
};
use storage::manager::StorageManager;
use storage::store::{KeyValueStore, MemoryStore};

use errors::DashboardError;

/// Main entry point for the CoinDash core library.
///
/// Owns the portfolio, the cached coin listing, the transient comparison
/// selection, and the services that operate on them. Persistence goes
/// through an injected key-value store and is write-through: every
/// mutation is saved immediately, the way the dashboard has always
/// behaved.
#[must_use]
pub struct CoinDash {
    portfolio: Portfolio,
    coin_list: Vec<Coin>,
    selection: ComparisonSelection,
    market_service: MarketService,
    portfolio_service: PortfolioService,
    comparison_service: ComparisonService,
    store: Box<dyn KeyValueStore>,
    /// When market data was last successfully fetched.
    last_updated: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for CoinDash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinDash")
            .field("holdings", &self.portfolio.holdings.len())
            .field("coins_cached", &self.coin_list.len())
            .field("settings", &self.portfolio.settings)
            .field("last_updated", &self.last_updated)
            .finish()
    }
}

impl CoinDash {
    /// Open a dashboard over a store, loading any persisted portfolio
    /// and theme. Uses the default provider registry (live API with
    /// static-price fallback).
    pub fn new(store: Box<dyn KeyValueStore>) -> Result<Self, DashboardError> {
        Self::with_registry(store, ProviderRegistry::new_with_defaults())
    }

    /// Open a dashboard with an explicit provider registry.
    /// Tests inject a mock provider through here.
    pub fn with_registry(
        store: Box<dyn KeyValueStore>,
        registry: ProviderRegistry,
    ) -> Result<Self, DashboardError> {
        let portfolio = StorageManager::load(store.as_ref())?;
        Ok(Self::build(store, registry, portfolio))
    }

    /// A dashboard with nothing persisted anywhere — volatile store,
    /// empty portfolio. Handy for demos and tests.
    pub fn in_memory() -> Self {
        Self::build(
            Box::new(MemoryStore::new()),
            ProviderRegistry::new_with_defaults(),
            Portfolio::default(),
        )
    }

    // ── Markets ─────────────────────────────────────────────────────

    /// Fetch the coin listing (up to `pages` pages of 200, market-cap
    /// order) and cache it. Returns how many coins were fetched.
    pub async fn refresh_markets(&mut self, pages: usize) -> Result<usize, DashboardError> {
        let vs = self.portfolio.settings.vs_currency.clone();
        let coins = self.market_service.coin_markets(&vs, pages).await?;
        let count = coins.len();
        self.coin_list = coins;
        self.touch();
        Ok(count)
    }

    /// The cached coin listing from the last `refresh_markets` call.
    #[must_use]
    pub fn coins(&self) -> &[Coin] {
        &self.coin_list
    }

    /// Search the cached listing by name or symbol. Empty query returns
    /// the top coins.
    #[must_use]
    pub fn search_coins(&self, query: &str) -> Vec<&Coin> {
        self.market_service.search(&self.coin_list, query)
    }

    /// Look a coin up in the cached listing by id, symbol, or name
    /// (case-insensitive).
    #[must_use]
    pub fn find_coin(&self, key: &str) -> Option<&Coin> {
        let needle = key.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.coin_list.iter().find(|c| {
            c.id == needle || c.symbol.to_lowercase() == needle || c.name.to_lowercase() == needle
        })
    }

    /// Fetch global market statistics.
    pub async fn global_stats(&self) -> Result<GlobalStats, DashboardError> {
        let vs = &self.portfolio.settings.vs_currency;
        self.market_service.global_stats(vs).await
    }

    // ── Comparison ──────────────────────────────────────────────────

    /// Pick comparison coin A from the cached listing.
    pub fn select_coin_a(&mut self, id: &str) -> Result<(), DashboardError> {
        self.selection.coin_a = Some(self.selected_from_list(id)?);
        Ok(())
    }

    /// Pick comparison coin B from the cached listing.
    pub fn select_coin_b(&mut self, id: &str) -> Result<(), DashboardError> {
        self.selection.coin_b = Some(self.selected_from_list(id)?);
        Ok(())
    }

    /// The current (transient) comparison picks.
    #[must_use]
    pub fn selection(&self) -> &ComparisonSelection {
        &self.selection
    }

    /// Forget both comparison picks.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Compare the two selected coins. Fails if either pick is missing
    /// or both picks are the same coin.
    pub async fn compare_selected(&mut self) -> Result<MarketCapComparison, DashboardError> {
        let (a, b) = match (&self.selection.coin_a, &self.selection.coin_b) {
            (Some(a), Some(b)) => (a.clone(), b.clone()),
            _ => return Err(DashboardError::SelectionIncomplete),
        };
        self.compare(&a.id, &b.id).await
    }

    /// Compare two coins by id: one batched quote fetch, then the
    /// re-pricing computation.
    pub async fn compare(
        &mut self,
        id_a: &str,
        id_b: &str,
    ) -> Result<MarketCapComparison, DashboardError> {
        let vs = self.portfolio.settings.vs_currency.clone();
        let ids = vec![id_a.to_string(), id_b.to_string()];
        let quotes = self.market_service.quotes(&ids, &vs).await?;

        let snapshot_a = self.snapshot(id_a, &vs, &quotes)?;
        let snapshot_b = self.snapshot(id_b, &vs, &quotes)?;

        let result = self.comparison_service.compare(snapshot_a, snapshot_b)?;
        self.touch();
        Ok(result)
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Current holdings, in insertion order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    /// Add a holding and persist. The coin is resolved against the
    /// cached listing (capturing the live price and canonical id); an
    /// unknown coin falls back to the static price table, or price 0
    /// until the next refresh. Returns the new holding's id.
    pub fn add_holding(
        &mut self,
        name: &str,
        amount: f64,
        purchase_price: Option<f64>,
    ) -> Result<uuid::Uuid, DashboardError> {
        let (coin_id, display_name, price) = match self.find_coin(name) {
            Some(coin) => (
                coin.id.clone(),
                coin.name.clone(),
                coin.current_price.unwrap_or(0.0),
            ),
            None => {
                let id = slugify(name);
                let price = static_price(&id).unwrap_or(0.0);
                (id, name.trim().to_string(), price)
            }
        };

        let mut holding = Holding::new(coin_id, display_name, amount, price);
        holding.purchase_price = purchase_price;
        let id = holding.id;

        self.portfolio_service
            .add_holding(&mut self.portfolio, holding)?;
        self.persist_holdings()?;
        Ok(id)
    }

    /// Remove a holding by its list position and persist.
    /// Returns the removed record.
    pub fn remove_holding(&mut self, index: usize) -> Result<Holding, DashboardError> {
        let removed = self
            .portfolio_service
            .remove_holding(&mut self.portfolio, index)?;
        self.persist_holdings()?;
        Ok(removed)
    }

    /// Remove every holding and delete the storage key.
    pub fn clear_holdings(&mut self) -> Result<(), DashboardError> {
        self.portfolio_service.clear(&mut self.portfolio);
        StorageManager::clear_holdings(self.store.as_mut())
    }

    /// Re-fetch quotes for all held coins in one batched call, re-value
    /// the holdings found in the response, and persist. Holdings the
    /// response doesn't cover keep their previous price. Returns how
    /// many holdings were updated.
    pub async fn refresh_holdings(&mut self) -> Result<usize, DashboardError> {
        if self.portfolio.is_empty() {
            return Ok(0);
        }

        let vs = self.portfolio.settings.vs_currency.clone();
        let ids = self.portfolio.coin_ids();
        let quotes = self.market_service.quotes(&ids, &vs).await?;

        let updated = self
            .portfolio_service
            .apply_quotes(&mut self.portfolio, &quotes);
        self.persist_holdings()?;
        self.touch();
        Ok(updated)
    }

    /// Total portfolio value: sum of each holding's `amount × price`.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.portfolio.holdings.iter().map(|h| h.value).sum()
    }

    /// Full aggregation summary with per-holding breakdown.
    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        self.portfolio_service.summarize(&self.portfolio)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.portfolio.settings.theme
    }

    /// Set the theme and persist the flag.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), DashboardError> {
        self.portfolio.settings.theme = theme;
        StorageManager::save_theme(self.store.as_mut(), theme)
    }

    /// Flip the theme and persist. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, DashboardError> {
        let next = self.portfolio.settings.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    #[must_use]
    pub fn vs_currency(&self) -> &str {
        &self.portfolio.settings.vs_currency
    }

    /// Set the quote currency (lowercase API code, e.g. "usd", "eur").
    /// Takes effect on the next fetch; cached prices are not converted.
    pub fn set_vs_currency(&mut self, code: &str) -> Result<(), DashboardError> {
        let trimmed = code.trim().to_lowercase();
        if trimmed.is_empty() || trimmed.len() > 6 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DashboardError::ValidationError(format!(
                "Invalid quote currency '{code}': expected a short alphanumeric code (e.g., usd, eur)"
            )));
        }
        self.portfolio.settings.vs_currency = trimmed;
        Ok(())
    }

    // ── Status ──────────────────────────────────────────────────────

    /// When market data was last successfully fetched, if ever.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Names of the configured market-data providers, in priority order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.market_service.provider_names()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(store: Box<dyn KeyValueStore>, registry: ProviderRegistry, portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            coin_list: Vec::new(),
            selection: ComparisonSelection::default(),
            market_service: MarketService::new(registry),
            portfolio_service: PortfolioService::new(),
            comparison_service: ComparisonService::new(),
            store,
            last_updated: None,
        }
    }

    fn selected_from_list(&self, id: &str) -> Result<SelectedCoin, DashboardError> {
        let coin = self
            .coin_list
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DashboardError::CoinNotFound(id.to_string()))?;
        Ok(SelectedCoin {
            id: coin.id.clone(),
            symbol: coin.symbol.to_uppercase(),
            name: coin.name.clone(),
        })
    }

    /// Assemble a validated snapshot for one comparison side: price and
    /// 24h change from the quote, market cap from the quote (listing
    /// fallback), supply from the listing when known.
    fn snapshot(
        &self,
        id: &str,
        vs_currency: &str,
        quotes: &HashMap<String, CoinQuote>,
    ) -> Result<CoinSnapshot, DashboardError> {
        let quote = quotes
            .get(id)
            .ok_or_else(|| DashboardError::PriceNotAvailable {
                id: id.to_string(),
                currency: vs_currency.to_string(),
            })?;

        let listed = self.coin_list.iter().find(|c| c.id == id);
        let market_cap = quote
            .market_cap
            .or_else(|| listed.and_then(|c| c.market_cap))
            .ok_or_else(|| {
                DashboardError::ValidationError(format!("No market cap data for '{id}'"))
            })?;

        Ok(CoinSnapshot {
            id: id.to_string(),
            symbol: listed
                .map(|c| c.symbol.to_uppercase())
                .unwrap_or_else(|| id.to_uppercase()),
            price: quote.price,
            market_cap,
            change_24h: quote.change_24h.unwrap_or(0.0),
            circulating_supply: listed.and_then(|c| c.circulating_supply),
        })
    }

    fn persist_holdings(&mut self) -> Result<(), DashboardError> {
        StorageManager::save_holdings(self.store.as_mut(), &self.portfolio.holdings)
    }

    fn touch(&mut self) {
        self.last_updated = Some(Utc::now());
    }
}
