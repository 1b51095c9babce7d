use serde::{Deserialize, Serialize};

/// One side of a comparison: the coin the user picked from the list.
/// Held only in memory — never persisted, discarded with the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// The two transient comparison picks (A, B).
#[derive(Debug, Clone, Default)]
pub struct ComparisonSelection {
    pub coin_a: Option<SelectedCoin>,
    pub coin_b: Option<SelectedCoin>,
}

impl ComparisonSelection {
    pub fn clear(&mut self) {
        self.coin_a = None;
        self.coin_b = None;
    }

    pub fn is_complete(&self) -> bool {
        self.coin_a.is_some() && self.coin_b.is_some()
    }
}

/// Point-in-time market data for one side of a comparison, after quote
/// validation (price and market cap are known-positive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub id: String,

    /// Uppercased ticker for display
    pub symbol: String,

    pub price: f64,

    pub market_cap: f64,

    /// 24h change percent; 0 when the API reported none
    pub change_24h: f64,

    /// Circulating supply when known from the markets listing
    pub circulating_supply: Option<f64>,
}

/// Output of the bare re-pricing formula, before the full comparison
/// view-model is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repricing {
    /// Supply used as the denominator
    pub supply_a: f64,
    pub hypothetical_price: f64,
    pub multiplier: f64,
    pub change_pct: f64,
}

/// Result of the market-cap re-pricing computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCapComparison {
    pub coin_a: CoinSnapshot,
    pub coin_b: CoinSnapshot,

    /// Supply of A used as the re-pricing denominator — taken from the
    /// listing when available, otherwise derived as `market_cap_a / price_a`
    pub supply_a: f64,

    /// Price of A if its market cap equaled B's: `market_cap_b / supply_a`
    pub hypothetical_price: f64,

    /// `hypothetical_price / price_a`
    pub multiplier: f64,

    /// `(multiplier − 1) × 100`
    pub change_pct: f64,

    /// `market_cap_a / market_cap_b`
    pub market_cap_ratio: f64,

    /// `(market_cap_b / market_cap_a − 1) × 100`
    pub market_cap_diff_pct: f64,
}
