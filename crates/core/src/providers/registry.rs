use super::coingecko::CoinGeckoProvider;
use super::static_prices::StaticPriceProvider;
use super::traits::MarketDataProvider;

/// Registry of market-data providers, tried in registration order.
///
/// The first provider is the live API; the static fallback sits behind it.
/// New providers can be added without modifying existing code.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers pre-configured:
    /// CoinGecko first, static prices as the offline fallback.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CoinGeckoProvider::new()));
        registry.register(Box::new(StaticPriceProvider::new()));
        registry
    }

    /// Register a provider at the end of the priority order.
    pub fn register(&mut self, provider: Box<dyn MarketDataProvider>) {
        self.providers.push(provider);
    }

    /// All providers in priority order.
    pub fn providers(&self) -> Vec<&dyn MarketDataProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
