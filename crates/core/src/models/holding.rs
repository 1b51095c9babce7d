use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coin::slugify;

/// A single persisted portfolio entry: an amount of a coin, the price it
/// was last valued at, and (optionally) what was paid for it.
///
/// Older stored records predate several of these fields. Every field that
/// was added later carries a serde default so legacy portfolios keep
/// loading: missing `purchase_price`/`category` stay `None`, a missing
/// `id` gets a fresh one, a missing `added_at` is stamped at load time,
/// and a missing `coin_id` is re-derived from the name by the
/// storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// API coin id (e.g., "bitcoin"). Empty in legacy records;
    /// normalized from `name` on load.
    #[serde(default)]
    pub coin_id: String,

    /// Display name as the user entered it (e.g., "Bitcoin")
    pub name: String,

    /// Amount held (always positive)
    pub amount: f64,

    /// Last-fetched current price in the quote currency
    pub price: f64,

    /// Derived value: `amount × price`. Stored so the portfolio renders
    /// offline; recomputed on every refresh.
    pub value: f64,

    /// Price paid per unit, if recorded
    #[serde(default)]
    pub purchase_price: Option<f64>,

    /// Optional user-assigned grouping (e.g., "DeFi", "Layer 1")
    #[serde(default)]
    pub category: Option<String>,

    /// When this holding was added
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl Holding {
    pub fn new(
        coin_id: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        price: f64,
    ) -> Self {
        let name = name.into();
        let mut coin_id = coin_id.into();
        if coin_id.is_empty() {
            coin_id = slugify(&name);
        }
        Self {
            id: Uuid::new_v4(),
            coin_id,
            name,
            amount,
            price,
            value: amount * price,
            purchase_price: None,
            category: None,
            added_at: Utc::now(),
        }
    }

    /// Create a holding with a recorded purchase price.
    pub fn with_purchase_price(
        coin_id: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        price: f64,
        purchase_price: f64,
    ) -> Self {
        let mut holding = Self::new(coin_id, name, amount, price);
        holding.purchase_price = Some(purchase_price);
        holding
    }

    /// Re-value this holding at a new current price.
    pub fn apply_price(&mut self, price: f64) {
        self.price = price;
        self.value = self.amount * price;
    }

    /// Cost of acquiring this holding: `amount × purchase_price`.
    /// Legacy records without a purchase price fall back to the last
    /// fetched price, so gain/loss reads as zero rather than nonsense.
    pub fn invested(&self) -> f64 {
        self.amount * self.purchase_price.unwrap_or(self.price)
    }

    /// Absolute gain/loss: current value minus invested cost.
    pub fn gain_loss(&self) -> f64 {
        self.value - self.invested()
    }
}
