use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of the entire portfolio at the moment it was computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// When this summary was computed
    pub computed_at: DateTime<Utc>,

    /// Quote currency for all monetary values
    pub currency: String,

    /// Number of holdings
    pub holding_count: usize,

    /// Total portfolio value: sum of each holding's `amount × price`
    pub total_value: f64,

    /// Total invested: sum of `amount × purchase_price`
    /// (current-price fallback for legacy records)
    pub total_invested: f64,

    /// Absolute P&L: `total_value − total_invested`
    pub total_gain_loss: f64,

    /// Percentage return: `(total_gain_loss / total_invested) × 100`
    pub total_return_pct: f64,

    /// Per-holding breakdown, largest allocation first
    pub holdings: Vec<HoldingSummary>,
}

/// Summary of a single holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingSummary {
    /// Id of the underlying holding
    pub holding_id: Uuid,

    /// API coin id
    pub coin_id: String,

    /// Display name
    pub name: String,

    /// Amount held
    pub amount: f64,

    /// Last-fetched price
    pub price: f64,

    /// Current value
    pub value: f64,

    /// Invested cost
    pub invested: f64,

    /// Absolute gain/loss
    pub gain_loss: f64,

    /// Percentage return against invested cost
    pub return_pct: f64,

    /// Share of total portfolio value: `value / total_value × 100`
    pub allocation_pct: f64,
}
