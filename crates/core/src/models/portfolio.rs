use serde::{Deserialize, Serialize};

use super::holding::Holding;
use super::settings::Settings;

/// The main data container: the holdings list plus user settings.
///
/// Holdings are stored as JSON text under the portfolio storage key;
/// the theme flag is stored separately (see `storage::manager`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    /// All holdings, in insertion order
    pub holdings: Vec<Holding>,

    /// User settings (theme, quote currency)
    pub settings: Settings,
}

impl Portfolio {
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Distinct API coin ids across all holdings, in first-seen order.
    /// Used to build the batched refresh request.
    pub fn coin_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.holdings
            .iter()
            .filter_map(|h| {
                if seen.insert(h.coin_id.as_str()) {
                    Some(h.coin_id.clone())
                } else {
                    None
                }
            })
            .collect()
    }
}
