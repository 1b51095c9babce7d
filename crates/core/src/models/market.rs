use serde::{Deserialize, Serialize};

/// Global market statistics from the upstream `/global` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Quote currency the monetary totals are expressed in
    pub currency: String,

    /// Total market capitalization across all tracked coins
    pub total_market_cap: f64,

    /// Total 24h trading volume
    pub total_volume: f64,

    /// 24h change of the total market cap, percent
    pub market_cap_change_24h_pct: Option<f64>,

    /// Bitcoin's share of the total market cap, percent
    pub btc_dominance_pct: Option<f64>,

    /// Number of active cryptocurrencies tracked upstream
    pub active_cryptocurrencies: Option<u64>,
}
