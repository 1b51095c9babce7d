use crate::errors::DashboardError;
use crate::models::comparison::{CoinSnapshot, MarketCapComparison, Repricing};

/// The market-cap re-pricing calculator: what coin A would be worth if
/// its market capitalization equaled coin B's.
///
/// Stateless and pure — the facade fetches the quotes and hands the
/// snapshots in.
pub struct ComparisonService;

impl ComparisonService {
    pub fn new() -> Self {
        Self
    }

    /// Core formula. Supply defaults to `market_cap_a / price_a` when the
    /// listing didn't report one.
    ///
    /// Inputs that would make the arithmetic meaningless (zero, negative,
    /// or non-finite prices, caps, or supplies) are rejected instead of
    /// letting Inf/NaN propagate into the result.
    pub fn reprice(
        &self,
        price_a: f64,
        market_cap_a: f64,
        market_cap_b: f64,
        supply_a: Option<f64>,
    ) -> Result<Repricing, DashboardError> {
        if !price_a.is_finite() || price_a <= 0.0 {
            return Err(DashboardError::ValidationError(format!(
                "Price must be a positive number, got {price_a}"
            )));
        }
        if !market_cap_a.is_finite() || market_cap_a <= 0.0 {
            return Err(DashboardError::ValidationError(format!(
                "Market cap of the base coin must be positive, got {market_cap_a}"
            )));
        }
        if !market_cap_b.is_finite() || market_cap_b <= 0.0 {
            return Err(DashboardError::ValidationError(format!(
                "Market cap of the target coin must be positive, got {market_cap_b}"
            )));
        }

        let supply_a = match supply_a {
            Some(supply) => {
                if !supply.is_finite() || supply <= 0.0 {
                    return Err(DashboardError::ValidationError(format!(
                        "Circulating supply must be positive, got {supply}"
                    )));
                }
                supply
            }
            None => market_cap_a / price_a,
        };

        let hypothetical_price = market_cap_b / supply_a;
        let multiplier = hypothetical_price / price_a;
        let change_pct = (multiplier - 1.0) * 100.0;

        Ok(Repricing {
            supply_a,
            hypothetical_price,
            multiplier,
            change_pct,
        })
    }

    /// Full comparison between two coin snapshots.
    pub fn compare(
        &self,
        coin_a: CoinSnapshot,
        coin_b: CoinSnapshot,
    ) -> Result<MarketCapComparison, DashboardError> {
        if coin_a.id == coin_b.id {
            return Err(DashboardError::ValidationError(
                "Cannot compare a coin against itself".into(),
            ));
        }

        let repricing = self.reprice(
            coin_a.price,
            coin_a.market_cap,
            coin_b.market_cap,
            coin_a.circulating_supply,
        )?;

        let market_cap_ratio = coin_a.market_cap / coin_b.market_cap;
        let market_cap_diff_pct = (coin_b.market_cap / coin_a.market_cap - 1.0) * 100.0;

        Ok(MarketCapComparison {
            coin_a,
            coin_b,
            supply_a: repricing.supply_a,
            hypothetical_price: repricing.hypothetical_price,
            multiplier: repricing.multiplier,
            change_pct: repricing.change_pct,
            market_cap_ratio,
            market_cap_diff_pct,
        })
    }
}

impl Default for ComparisonService {
    fn default() -> Self {
        Self::new()
    }
}
