use crate::errors::DashboardError;
use crate::models::coin::slugify;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::models::settings::{Settings, Theme};

use super::store::KeyValueStore;

/// Storage key for the holdings array (JSON text).
pub const PORTFOLIO_KEY: &str = "cryptoPortfolio";

/// Storage key for the theme flag (plain string, "dark" / "light").
pub const THEME_KEY: &str = "theme";

/// High-level storage operations over an injected key-value store.
///
/// The key layout matches what the dashboard has always written: the
/// holdings array as JSON under `cryptoPortfolio`, the theme flag as a
/// bare string under `theme`. Missing keys load as an empty portfolio
/// with the dark theme.
pub struct StorageManager;

impl StorageManager {
    /// Load the full portfolio state from a store.
    pub fn load(store: &dyn KeyValueStore) -> Result<Portfolio, DashboardError> {
        let holdings = Self::load_holdings(store)?;
        let theme = Self::load_theme(store)?;
        Ok(Portfolio {
            holdings,
            settings: Settings {
                theme,
                ..Settings::default()
            },
        })
    }

    /// Load the holdings array. A missing key is an empty portfolio;
    /// corrupted JSON is an error.
    ///
    /// Legacy records are normalized on the way in: a record without a
    /// stored `coin_id` gets one slugified from its display name.
    pub fn load_holdings(store: &dyn KeyValueStore) -> Result<Vec<Holding>, DashboardError> {
        let Some(json) = store.get(PORTFOLIO_KEY)? else {
            return Ok(Vec::new());
        };

        let mut holdings: Vec<Holding> = serde_json::from_str(&json)?;
        for holding in &mut holdings {
            if holding.coin_id.is_empty() {
                holding.coin_id = slugify(&holding.name);
            }
        }
        Ok(holdings)
    }

    /// Write the holdings array as JSON text.
    pub fn save_holdings(
        store: &mut dyn KeyValueStore,
        holdings: &[Holding],
    ) -> Result<(), DashboardError> {
        let json = serde_json::to_string(holdings)
            .map_err(|e| DashboardError::Serialization(format!("Failed to encode holdings: {e}")))?;
        store.set(PORTFOLIO_KEY, &json)
    }

    /// Delete the holdings key entirely (the "clear all" operation).
    pub fn clear_holdings(store: &mut dyn KeyValueStore) -> Result<(), DashboardError> {
        store.remove(PORTFOLIO_KEY)
    }

    /// Load the theme flag. Missing or unrecognized values are dark.
    pub fn load_theme(store: &dyn KeyValueStore) -> Result<Theme, DashboardError> {
        Ok(Theme::from_stored(store.get(THEME_KEY)?.as_deref()))
    }

    /// Write the theme flag.
    pub fn save_theme(store: &mut dyn KeyValueStore, theme: Theme) -> Result<(), DashboardError> {
        store.set(THEME_KEY, theme.as_str())
    }
}
