use chrono::Utc;
use std::collections::HashMap;

use crate::errors::DashboardError;
use crate::models::analytics::{HoldingSummary, PortfolioSummary};
use crate::models::coin::CoinQuote;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// Manages the holdings list and computes the aggregation totals.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Add a holding to the portfolio. Validates before committing.
    pub fn add_holding(
        &self,
        portfolio: &mut Portfolio,
        holding: Holding,
    ) -> Result<(), DashboardError> {
        self.validate_holding(&holding)?;
        portfolio.holdings.push(holding);
        Ok(())
    }

    /// Remove a holding by its list position. Returns the removed record.
    pub fn remove_holding(
        &self,
        portfolio: &mut Portfolio,
        index: usize,
    ) -> Result<Holding, DashboardError> {
        if index >= portfolio.holdings.len() {
            return Err(DashboardError::HoldingNotFound(index));
        }
        Ok(portfolio.holdings.remove(index))
    }

    /// Remove every holding.
    pub fn clear(&self, portfolio: &mut Portfolio) {
        portfolio.holdings.clear();
    }

    /// Re-value holdings from a batch of fresh quotes. Holdings whose
    /// coin id is absent from the batch keep their previous price and
    /// value. Returns how many holdings were updated.
    pub fn apply_quotes(
        &self,
        portfolio: &mut Portfolio,
        quotes: &HashMap<String, CoinQuote>,
    ) -> usize {
        let mut updated = 0;
        for holding in &mut portfolio.holdings {
            if let Some(quote) = quotes.get(&holding.coin_id) {
                holding.apply_price(quote.price);
                updated += 1;
            }
        }
        updated
    }

    /// Compute the full aggregation summary:
    /// total value, total invested, gain/loss, return %, and per-holding
    /// allocation. Holdings are listed largest allocation first.
    pub fn summarize(&self, portfolio: &Portfolio) -> PortfolioSummary {
        let total_value: f64 = portfolio.holdings.iter().map(|h| h.value).sum();
        let total_invested: f64 = portfolio.holdings.iter().map(|h| h.invested()).sum();
        let total_gain_loss = total_value - total_invested;
        let total_return_pct = if total_invested > 0.0 {
            (total_gain_loss / total_invested) * 100.0
        } else {
            0.0
        };

        let mut holdings: Vec<HoldingSummary> = portfolio
            .holdings
            .iter()
            .map(|h| {
                let invested = h.invested();
                let gain_loss = h.value - invested;
                HoldingSummary {
                    holding_id: h.id,
                    coin_id: h.coin_id.clone(),
                    name: h.name.clone(),
                    amount: h.amount,
                    price: h.price,
                    value: h.value,
                    invested,
                    gain_loss,
                    return_pct: if invested > 0.0 {
                        (gain_loss / invested) * 100.0
                    } else {
                        0.0
                    },
                    allocation_pct: if total_value > 0.0 {
                        (h.value / total_value) * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        holdings.sort_by(|a, b| {
            b.allocation_pct
                .partial_cmp(&a.allocation_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        PortfolioSummary {
            computed_at: Utc::now(),
            currency: portfolio.settings.vs_currency.clone(),
            holding_count: portfolio.holdings.len(),
            total_value,
            total_invested,
            total_gain_loss,
            total_return_pct,
            holdings,
        }
    }

    /// Validation rules:
    /// - name must not be blank
    /// - amount must be a positive, finite number
    /// - a recorded purchase price must be non-negative and finite
    fn validate_holding(&self, holding: &Holding) -> Result<(), DashboardError> {
        if holding.name.trim().is_empty() {
            return Err(DashboardError::ValidationError(
                "Holding name must not be empty".into(),
            ));
        }
        if !holding.amount.is_finite() || holding.amount <= 0.0 {
            return Err(DashboardError::ValidationError(format!(
                "Holding amount must be a positive number, got {}",
                holding.amount
            )));
        }
        if let Some(pp) = holding.purchase_price {
            if !pp.is_finite() || pp < 0.0 {
                return Err(DashboardError::ValidationError(format!(
                    "Purchase price must be a non-negative number, got {pp}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
