//! # Ordering Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CANTEEN_THRESHOLD_POLICY=gross_subtotal                            │
//! │     CANTEEN_MAX_CART_ITEMS=50                                          │
//! │     CANTEEN_MAX_ITEM_QUANTITY=20                                       │
//! │     CANTEEN_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/ordering/ordering.toml (Linux)                           │
//! │     ~/Library/Application Support/com.canteen.ordering/ordering.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! threshold_policy = "unconditional"  # unconditional | gross_subtotal
//!
//! [cart]
//! max_items = 100
//! max_item_quantity = 999
//!
//! [log]
//! filter = "info,canteen=debug"
//! ```

use std::path::PathBuf;

use canteen_core::{CartLimits, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{OrderingError, OrderingResult};
use crate::promotions::ThresholdPolicy;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// How THRESHOLD promotions are filtered before pricing.
    #[serde(default)]
    pub threshold_policy: ThresholdPolicy,
}

/// Cart size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: u32,
}

fn default_max_items() -> usize {
    MAX_CART_ITEMS
}

fn default_max_item_quantity() -> u32 {
    MAX_ITEM_QUANTITY
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            max_items: default_max_items(),
            max_item_quantity: default_max_item_quantity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Fallback filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,canteen=debug".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete ordering configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl OrderingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (ordering.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> OrderingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading ordering config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load ordering config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> OrderingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| OrderingError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| OrderingError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| OrderingError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Ordering config saved");
        Ok(())
    }

    pub fn validate(&self) -> OrderingResult<()> {
        if self.cart.max_items == 0 {
            return Err(OrderingError::InvalidConfig(
                "cart.max_items must be greater than 0".into(),
            ));
        }
        if self.cart.max_item_quantity == 0 {
            return Err(OrderingError::InvalidConfig(
                "cart.max_item_quantity must be greater than 0".into(),
            ));
        }
        if self.log.filter.trim().is_empty() {
            return Err(OrderingError::InvalidConfig("log.filter must not be empty".into()));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are ignored
    /// with a warning.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(policy) = var("CANTEEN_THRESHOLD_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding threshold policy from environment");
                    self.pricing.threshold_policy = parsed;
                }
                Err(_) => warn!(policy = %policy, "Unknown threshold policy in environment"),
            }
        }

        if let Some(max) = var("CANTEEN_MAX_CART_ITEMS") {
            match max.parse::<usize>() {
                Ok(m) => self.cart.max_items = m,
                Err(_) => warn!(value = %max, "Invalid CANTEEN_MAX_CART_ITEMS"),
            }
        }

        if let Some(max) = var("CANTEEN_MAX_ITEM_QUANTITY") {
            match max.parse::<u32>() {
                Ok(m) => self.cart.max_item_quantity = m,
                Err(_) => warn!(value = %max, "Invalid CANTEEN_MAX_ITEM_QUANTITY"),
            }
        }

        if let Some(filter) = var("CANTEEN_LOG") {
            self.log.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "canteen", "ordering")
            .map(|dirs| dirs.config_dir().join("ordering.toml"))
    }

    /// Limits for new carts.
    pub fn cart_limits(&self) -> CartLimits {
        CartLimits {
            max_items: self.cart.max_items,
            max_item_quantity: self.cart.max_item_quantity,
        }
    }

    pub fn threshold_policy(&self) -> ThresholdPolicy {
        self.pricing.threshold_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = OrderingConfig::default();
        assert_eq!(config.threshold_policy(), ThresholdPolicy::Unconditional);
        assert_eq!(config.cart_limits(), CartLimits::default());
        assert_eq!(config.log.filter, "info,canteen=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: OrderingConfig = toml::from_str(
            r#"
            [pricing]
            threshold_policy = "gross_subtotal"

            [cart]
            max_items = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.threshold_policy(), ThresholdPolicy::GrossSubtotal);
        assert_eq!(config.cart.max_items, 10);
        assert_eq!(config.cart.max_item_quantity, MAX_ITEM_QUANTITY);
        assert_eq!(config.log, LogSettings::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CANTEEN_THRESHOLD_POLICY", "gross_subtotal"),
            ("CANTEEN_MAX_CART_ITEMS", "25"),
            ("CANTEEN_MAX_ITEM_QUANTITY", "lots"),
            ("CANTEEN_LOG", "warn"),
        ]);
        let mut config = OrderingConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.threshold_policy(), ThresholdPolicy::GrossSubtotal);
        assert_eq!(config.cart.max_items, 25);
        assert_eq!(config.cart.max_item_quantity, MAX_ITEM_QUANTITY);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_config_validation() {
        let mut config = OrderingConfig::default();
        config.cart.max_items = 0;
        assert!(matches!(config.validate(), Err(OrderingError::InvalidConfig(_))));

        let mut config = OrderingConfig::default();
        config.log.filter = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("canteen-ordering-{}", std::process::id()))
            .join("ordering.toml");

        let mut config = OrderingConfig::default();
        config.pricing.threshold_policy = ThresholdPolicy::GrossSubtotal;
        config.cart.max_item_quantity = 12;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[pricing]"));
        assert!(contents.contains("threshold_policy = \"gross_subtotal\""));

        let loaded: OrderingConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = std::env::temp_dir().join(format!("canteen-ordering-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ordering.toml");
        std::fs::write(&path, "[cart]\nmax_items = \"many\"\n").unwrap();

        assert!(matches!(
            OrderingConfig::load(Some(path.clone())),
            Err(OrderingError::ConfigLoadFailed(_))
        ));
        assert_eq!(OrderingConfig::load_or_default(Some(path)), OrderingConfig::default());

        let _ = std::fs::remove_dir_all(dir);
    }
}
