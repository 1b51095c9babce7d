// ═══════════════════════════════════════════════════════════════════
// Integration Tests — CoinDash facade end to end with a mock provider
// and a shared in-memory store
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use coindash_core::errors::DashboardError;
use coindash_core::models::coin::{Coin, CoinQuote};
use coindash_core::models::market::GlobalStats;
use coindash_core::models::settings::Theme;
use coindash_core::providers::registry::ProviderRegistry;
use coindash_core::providers::static_prices::StaticPriceProvider;
use coindash_core::providers::traits::MarketDataProvider;
use coindash_core::storage::manager::{PORTFOLIO_KEY, THEME_KEY};
use coindash_core::storage::store::{KeyValueStore, MemoryStore};
use coindash_core::CoinDash;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

/// Clonable store handle so a test can look inside the storage the
/// facade owns, and open a second facade over the same data.
#[derive(Clone)]
struct SharedStore(Arc<Mutex<MemoryStore>>);

impl SharedStore {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(MemoryStore::new())))
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).unwrap()
    }

    fn seed(&self, key: &str, value: &str) {
        self.0.lock().unwrap().set(key, value).unwrap();
    }

    fn has(&self, key: &str) -> bool {
        self.0.lock().unwrap().contains_key(key)
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError> {
        self.0.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.0.lock().unwrap().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), DashboardError> {
        self.0.lock().unwrap().remove(key)
    }
}

fn coin(
    id: &str,
    symbol: &str,
    name: &str,
    price: f64,
    cap: f64,
    supply: f64,
    change: f64,
) -> Coin {
    Coin {
        id: id.into(),
        symbol: symbol.into(),
        name: name.into(),
        image: None,
        current_price: Some(price),
        market_cap: Some(cap),
        circulating_supply: Some(supply),
        price_change_percentage_24h: Some(change),
    }
}

/// Three-coin market: BTC, ETH, SOL with consistent supply × price = cap.
fn sample_market() -> Vec<Coin> {
    vec![
        coin("bitcoin", "btc", "Bitcoin", 60_000.0, 1.2e12, 2.0e7, 1.5),
        coin("ethereum", "eth", "Ethereum", 3_000.0, 3.6e11, 1.2e8, -2.0),
        coin("solana", "sol", "Solana", 150.0, 6.0e10, 4.0e8, 0.7),
    ]
}

fn sample_quotes() -> HashMap<String, CoinQuote> {
    HashMap::from([
        (
            "bitcoin".to_string(),
            CoinQuote {
                price: 60_000.0,
                market_cap: Some(1.2e12),
                change_24h: Some(1.5),
            },
        ),
        (
            "ethereum".to_string(),
            CoinQuote {
                price: 3_000.0,
                market_cap: Some(3.6e11),
                change_24h: Some(-2.0),
            },
        ),
        (
            "solana".to_string(),
            CoinQuote {
                price: 150.0,
                market_cap: Some(6.0e10),
                change_24h: Some(0.7),
            },
        ),
    ])
}

struct MockMarketProvider {
    coins: Vec<Coin>,
    quotes: HashMap<String, CoinQuote>,
    global: Option<GlobalStats>,
}

impl MockMarketProvider {
    fn sample() -> Self {
        Self {
            coins: sample_market(),
            quotes: sample_quotes(),
            global: Some(GlobalStats {
                currency: "usd".into(),
                total_market_cap: 2.4e12,
                total_volume: 9.5e10,
                market_cap_change_24h_pct: Some(-0.4),
                btc_dominance_pct: Some(50.0),
                active_cryptocurrencies: Some(11_500),
            }),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketProvider {
    fn name(&self) -> &str {
        "MockMarket"
    }

    async fn coin_markets(
        &self,
        _vs_currency: &str,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<Coin>, DashboardError> {
        let start = (page - 1) * per_page;
        if start >= self.coins.len() {
            return Ok(Vec::new());
        }
        let end = (start + per_page).min(self.coins.len());
        Ok(self.coins[start..end].to_vec())
    }

    async fn simple_prices(
        &self,
        ids: &[String],
        _vs_currency: &str,
    ) -> Result<HashMap<String, CoinQuote>, DashboardError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.quotes.get(id).map(|q| (id.clone(), q.clone())))
            .collect())
    }

    async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, DashboardError> {
        self.global.clone().ok_or_else(|| DashboardError::Api {
            provider: "MockMarket".into(),
            message: format!("no global stats in {vs_currency}"),
        })
    }
}

struct FailingProvider;

#[async_trait]
impl MarketDataProvider for FailingProvider {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn coin_markets(
        &self,
        _vs_currency: &str,
        _per_page: usize,
        _page: usize,
    ) -> Result<Vec<Coin>, DashboardError> {
        Err(DashboardError::Network("connection refused".into()))
    }

    async fn simple_prices(
        &self,
        _ids: &[String],
        _vs_currency: &str,
    ) -> Result<HashMap<String, CoinQuote>, DashboardError> {
        Err(DashboardError::Network("connection refused".into()))
    }

    async fn global_stats(&self, _vs_currency: &str) -> Result<GlobalStats, DashboardError> {
        Err(DashboardError::Network("connection refused".into()))
    }
}

fn mock_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(MockMarketProvider::sample()));
    registry
}

fn dashboard(store: &SharedStore) -> CoinDash {
    CoinDash::with_registry(Box::new(store.clone()), mock_registry()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Markets flow
// ═══════════════════════════════════════════════════════════════════

mod markets {
    use super::*;

    #[tokio::test]
    async fn refresh_caches_the_listing() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);

        assert!(dash.coins().is_empty());
        assert!(dash.last_updated().is_none());

        let count = dash.refresh_markets(1).await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(dash.coins().len(), 3);
        assert_eq!(dash.coins()[0].id, "bitcoin");
        assert!(dash.last_updated().is_some());
    }

    #[tokio::test]
    async fn search_after_refresh() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();

        let hits = dash.search_coins("sol");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "solana");

        // Empty query: top of the listing.
        let top = dash.search_coins("");
        assert_eq!(top.len(), 3);
    }

    #[tokio::test]
    async fn find_coin_by_id_symbol_or_name() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();

        assert_eq!(dash.find_coin("bitcoin").unwrap().id, "bitcoin");
        assert_eq!(dash.find_coin("BTC").unwrap().id, "bitcoin");
        assert_eq!(dash.find_coin("Ethereum").unwrap().id, "ethereum");
        assert!(dash.find_coin("dogecoin").is_none());
        assert!(dash.find_coin("").is_none());
    }

    #[tokio::test]
    async fn global_stats_pass_through() {
        let store = SharedStore::new();
        let dash = dashboard(&store);
        let stats = dash.global_stats().await.unwrap();
        assert_eq!(stats.total_market_cap, 2.4e12);
        assert_eq!(stats.active_cryptocurrencies, Some(11_500));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Comparison flow
// ═══════════════════════════════════════════════════════════════════

mod comparison {
    use super::*;

    #[tokio::test]
    async fn select_and_compare() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();

        dash.select_coin_a("bitcoin").unwrap();
        dash.select_coin_b("ethereum").unwrap();
        assert!(dash.selection().is_complete());
        assert_eq!(dash.selection().coin_a.as_ref().unwrap().symbol, "BTC");

        let c = dash.compare_selected().await.unwrap();

        // Listing supply (2e7 BTC) drives the re-pricing.
        assert_eq!(c.supply_a, 2.0e7);
        assert_eq!(c.hypothetical_price, 3.6e11 / 2.0e7);
        assert_eq!(c.multiplier, c.hypothetical_price / 60_000.0);
        assert_eq!(c.change_pct, (c.multiplier - 1.0) * 100.0);
        assert!((c.market_cap_ratio - 1.2e12 / 3.6e11).abs() < 1e-9);
        assert!((c.market_cap_diff_pct - -70.0).abs() < 1e-9);
        assert_eq!(c.coin_a.symbol, "BTC");
        assert_eq!(c.coin_b.symbol, "ETH");
        assert_eq!(c.coin_a.change_24h, 1.5);
    }

    #[tokio::test]
    async fn worked_example_through_the_facade() {
        // priceA=100, capA=1M, capB=5M ⇒ 500, 5x, +400%
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(MockMarketProvider {
            coins: Vec::new(),
            quotes: HashMap::from([
                (
                    "alpha".to_string(),
                    CoinQuote {
                        price: 100.0,
                        market_cap: Some(1_000_000.0),
                        change_24h: None,
                    },
                ),
                (
                    "beta".to_string(),
                    CoinQuote {
                        price: 2.0,
                        market_cap: Some(5_000_000.0),
                        change_24h: None,
                    },
                ),
            ]),
            global: None,
        }));
        let store = SharedStore::new();
        let mut dash = CoinDash::with_registry(Box::new(store.clone()), registry).unwrap();

        let c = dash.compare("alpha", "beta").await.unwrap();
        assert_eq!(c.supply_a, 10_000.0);
        assert_eq!(c.hypothetical_price, 500.0);
        assert_eq!(c.multiplier, 5.0);
        assert_eq!(c.change_pct, 400.0);
        // No listing cached: symbols fall back to uppercased ids,
        // missing 24h changes read as zero.
        assert_eq!(c.coin_a.symbol, "ALPHA");
        assert_eq!(c.coin_a.change_24h, 0.0);
    }

    #[tokio::test]
    async fn compare_without_selection_fails() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        let err = dash.compare_selected().await.unwrap_err();
        assert!(matches!(err, DashboardError::SelectionIncomplete));
    }

    #[tokio::test]
    async fn half_selection_fails() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();
        dash.select_coin_a("bitcoin").unwrap();
        let err = dash.compare_selected().await.unwrap_err();
        assert!(matches!(err, DashboardError::SelectionIncomplete));
    }

    #[tokio::test]
    async fn selecting_an_unlisted_coin_fails() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();
        let err = dash.select_coin_a("dogecoin").unwrap_err();
        assert!(matches!(err, DashboardError::CoinNotFound(_)));
    }

    #[tokio::test]
    async fn comparing_a_coin_with_itself_fails() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();
        let err = dash.compare("bitcoin", "bitcoin").await.unwrap_err();
        assert!(matches!(err, DashboardError::ValidationError(_)));
    }

    #[tokio::test]
    async fn unquoted_coin_fails_with_price_not_available() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();
        let err = dash.compare("bitcoin", "dogecoin").await.unwrap_err();
        assert!(matches!(err, DashboardError::PriceNotAvailable { .. }));
    }

    #[tokio::test]
    async fn clear_selection_resets() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();
        dash.select_coin_a("bitcoin").unwrap();
        dash.select_coin_b("ethereum").unwrap();
        dash.clear_selection();
        assert!(!dash.selection().is_complete());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Portfolio flow
// ═══════════════════════════════════════════════════════════════════

mod portfolio {
    use super::*;

    #[tokio::test]
    async fn add_resolves_against_the_listing() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.refresh_markets(1).await.unwrap();

        // Symbol lookup captures the canonical id, name, and live price.
        dash.add_holding("BTC", 0.5, Some(40_000.0)).unwrap();

        let h = &dash.holdings()[0];
        assert_eq!(h.coin_id, "bitcoin");
        assert_eq!(h.name, "Bitcoin");
        assert_eq!(h.price, 60_000.0);
        assert_eq!(h.value, 30_000.0);
        assert_eq!(h.purchase_price, Some(40_000.0));
    }

    #[test]
    fn add_unknown_coin_uses_the_static_table() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);

        // No listing cached; "Ripple" slugifies to a known static id.
        dash.add_holding("Ripple", 1000.0, None).unwrap();

        let h = &dash.holdings()[0];
        assert_eq!(h.coin_id, "ripple");
        assert_eq!(h.price, 0.5);
        assert_eq!(h.value, 500.0);
    }

    #[test]
    fn add_completely_unknown_coin_is_worth_zero_until_refresh() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);

        dash.add_holding("Obscure Coin", 42.0, None).unwrap();

        let h = &dash.holdings()[0];
        assert_eq!(h.coin_id, "obscure-coin");
        assert_eq!(h.price, 0.0);
        assert_eq!(h.value, 0.0);
    }

    #[test]
    fn add_persists_immediately() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.add_holding("Bitcoin", 1.0, None).unwrap();

        let raw = store.raw(PORTFOLIO_KEY).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn invalid_add_leaves_storage_untouched() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);

        assert!(dash.add_holding("", 1.0, None).is_err());
        assert!(dash.add_holding("Bitcoin", 0.0, None).is_err());
        assert!(dash.add_holding("Bitcoin", -1.0, None).is_err());

        assert!(dash.holdings().is_empty());
        assert!(!store.has(PORTFOLIO_KEY));
    }

    #[test]
    fn remove_by_index_persists() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.add_holding("Bitcoin", 1.0, None).unwrap();
        let before = store.raw(PORTFOLIO_KEY).unwrap();

        dash.add_holding("Solana", 4.0, None).unwrap();
        let removed = dash.remove_holding(1).unwrap();
        assert_eq!(removed.coin_id, "solana");

        // Add then remove of the same index restores the stored shape.
        assert_eq!(store.raw(PORTFOLIO_KEY).unwrap(), before);
    }

    #[test]
    fn remove_out_of_range_fails() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        let err = dash.remove_holding(0).unwrap_err();
        assert!(matches!(err, DashboardError::HoldingNotFound(0)));
    }

    #[test]
    fn clear_deletes_the_storage_key() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.add_holding("Bitcoin", 1.0, None).unwrap();
        assert!(store.has(PORTFOLIO_KEY));

        dash.clear_holdings().unwrap();
        assert!(dash.holdings().is_empty());
        assert!(!store.has(PORTFOLIO_KEY));
    }

    #[tokio::test]
    async fn refresh_updates_prices_and_persists() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);

        dash.add_holding("Bitcoin", 0.5, None).unwrap();
        dash.add_holding("Obscure Coin", 42.0, None).unwrap();
        assert_eq!(dash.holdings()[0].price, 0.0);

        let updated = dash.refresh_holdings().await.unwrap();
        assert_eq!(updated, 1);
        assert_eq!(dash.holdings()[0].price, 60_000.0);
        assert_eq!(dash.holdings()[0].value, 30_000.0);
        // Unquoted holding keeps its previous price.
        assert_eq!(dash.holdings()[1].price, 0.0);
        assert!(dash.last_updated().is_some());

        // A fresh facade over the same store sees the refreshed values.
        let dash2 = dashboard(&store);
        assert_eq!(dash2.holdings()[0].price, 60_000.0);
    }

    #[tokio::test]
    async fn refresh_of_empty_portfolio_is_a_no_op() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        let updated = dash.refresh_holdings().await.unwrap();
        assert_eq!(updated, 0);
        assert!(dash.last_updated().is_none());
    }

    #[tokio::test]
    async fn refresh_falls_back_to_static_prices_when_api_is_down() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(FailingProvider));
        registry.register(Box::new(StaticPriceProvider::new()));

        let store = SharedStore::new();
        let mut dash = CoinDash::with_registry(Box::new(store.clone()), registry).unwrap();
        dash.add_holding("Bitcoin", 2.0, None).unwrap();

        let updated = dash.refresh_holdings().await.unwrap();
        assert_eq!(updated, 1);
        assert_eq!(dash.holdings()[0].price, 60_000.0);
        assert_eq!(dash.holdings()[0].value, 120_000.0);
    }

    #[test]
    fn summary_reflects_holdings() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        dash.add_holding("Ripple", 1000.0, Some(0.25)).unwrap();

        let s = dash.portfolio_summary();
        assert_eq!(s.holding_count, 1);
        assert_eq!(s.total_value, 500.0);
        assert_eq!(s.total_invested, 250.0);
        assert_eq!(s.total_gain_loss, 250.0);
        assert_eq!(s.total_return_pct, 100.0);
        assert_eq!(dash.total_value(), 500.0);
    }

    #[test]
    fn legacy_stored_records_load_and_normalize() {
        let store = SharedStore::new();
        store.seed(
            PORTFOLIO_KEY,
            r#"[{"name": "Bitcoin Cash", "amount": 2.0, "price": 300.0, "value": 600.0}]"#,
        );

        let dash = dashboard(&store);
        assert_eq!(dash.holdings().len(), 1);
        assert_eq!(dash.holdings()[0].coin_id, "bitcoin-cash");
        assert_eq!(dash.holdings()[0].purchase_price, None);
    }

    #[test]
    fn corrupted_stored_portfolio_fails_to_open() {
        let store = SharedStore::new();
        store.seed(PORTFOLIO_KEY, "{broken json");
        let err = CoinDash::with_registry(Box::new(store.clone()), mock_registry()).unwrap_err();
        assert!(matches!(err, DashboardError::Deserialization(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings flow
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn theme_defaults_to_dark() {
        let store = SharedStore::new();
        let dash = dashboard(&store);
        assert_eq!(dash.theme(), Theme::Dark);
    }

    #[test]
    fn toggle_persists_the_flag() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);

        assert_eq!(dash.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("light"));

        assert_eq!(dash.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn stored_theme_survives_reopening() {
        let store = SharedStore::new();
        {
            let mut dash = dashboard(&store);
            dash.set_theme(Theme::Light).unwrap();
        }
        let dash = dashboard(&store);
        assert_eq!(dash.theme(), Theme::Light);
    }

    #[test]
    fn vs_currency_is_normalized() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        assert_eq!(dash.vs_currency(), "usd");

        dash.set_vs_currency(" EUR ").unwrap();
        assert_eq!(dash.vs_currency(), "eur");
    }

    #[test]
    fn invalid_vs_currency_is_rejected() {
        let store = SharedStore::new();
        let mut dash = dashboard(&store);
        assert!(dash.set_vs_currency("").is_err());
        assert!(dash.set_vs_currency("US$").is_err());
        assert!(dash.set_vs_currency("waytoolongcode").is_err());
        assert_eq!(dash.vs_currency(), "usd");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Construction
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn in_memory_starts_empty() {
        let dash = CoinDash::in_memory();
        assert!(dash.holdings().is_empty());
        assert!(dash.coins().is_empty());
        assert_eq!(dash.theme(), Theme::Dark);
    }

    #[test]
    fn default_registry_has_live_api_and_fallback() {
        let dash = CoinDash::in_memory();
        assert_eq!(dash.provider_names(), vec!["CoinGecko", "StaticPrices"]);
    }

    #[test]
    fn debug_output_summarizes_state() {
        let dash = CoinDash::in_memory();
        let debug = format!("{dash:?}");
        assert!(debug.contains("CoinDash"));
        assert!(debug.contains("holdings"));
    }
}
