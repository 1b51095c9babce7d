use serde::{Deserialize, Serialize};

/// A single coin row from the markets listing.
///
/// This is an immutable snapshot per fetch — the library never mutates it
/// locally. Field names match the upstream API wire format so the listing
/// deserializes directly.
///
/// Numeric fields are `Option` on purpose: the API returns `null` for
/// delisted or unpriced coins, and a missing circulating supply is an
/// expected input to the comparison calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// API identifier, lowercase slug (e.g., "bitcoin")
    pub id: String,

    /// Ticker symbol as reported by the API, lowercase (e.g., "btc")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Logo image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Latest price in the quote currency
    pub current_price: Option<f64>,

    /// Market capitalization in the quote currency
    pub market_cap: Option<f64>,

    /// Units in public circulation
    pub circulating_supply: Option<f64>,

    /// 24-hour price change, percent
    pub price_change_percentage_24h: Option<f64>,
}

impl Coin {
    /// Case-insensitive match against a search query, on name or symbol.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.symbol.to_lowercase().contains(query_lower)
    }
}

/// A slim price snapshot from the batched simple-price endpoint.
/// Quoted in the currency the request asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinQuote {
    /// Latest price
    pub price: f64,

    /// Market capitalization, when the API reports one
    pub market_cap: Option<f64>,

    /// 24-hour price change, percent
    pub change_24h: Option<f64>,
}

/// Derive an API coin id from a display name the way the upstream does:
/// lowercase, whitespace runs collapsed to single hyphens.
/// E.g., "Bitcoin Cash" → "bitcoin-cash".
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
