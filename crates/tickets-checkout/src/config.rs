//! # Checkout Configuration
//!
//! Currency display and cart limits for a checkout deployment.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TICKETS_CURRENCY_SYMBOL=€                                           │
//! │     TICKETS_MAX_CART_ITEMS=50                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/checkout/checkout.toml (Linux)                           │
//! │     ~/Library/Application Support/com.eventtickets.checkout/ (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     "$1,234.56", 100 items, 999 per item                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [currency]
//! symbol = "€"
//! position = "after"          # before | after
//! thousands_separator = "."
//! decimal_separator = ","
//! decimal_places = 2
//!
//! [cart]
//! max_items = 100
//! max_quantity = 999
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use tickets_core::{
    CurrencyFormat, CurrencyFormatter, DEFAULT_MAX_CART_ITEMS, DEFAULT_MAX_ITEM_QUANTITY,
};

use crate::error::ConfigError;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "checkout.toml";

// =============================================================================
// Cart Limits
// =============================================================================

/// Ceilings enforced by the checkout commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    /// Distinct items per cart
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Quantity per item
    #[serde(default = "default_max_quantity")]
    pub max_quantity: i64,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_CART_ITEMS
}

fn default_max_quantity() -> i64 {
    DEFAULT_MAX_ITEM_QUANTITY
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_items: default_max_items(),
            max_quantity: default_max_quantity(),
        }
    }
}

// =============================================================================
// Checkout Config
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub currency: CurrencyFormat,

    #[serde(default)]
    pub cart: CartLimits,
}

impl CheckoutConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Override with the TOML file (explicit path, else the platform one)
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration, falling back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing tables and keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Writes configuration to file, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.currency.validate()?;

        if self.cart.max_items == 0 {
            return Err(ConfigError::Invalid(
                "cart.max_items must be greater than 0".into(),
            ));
        }

        if self.cart.max_quantity <= 0 {
            return Err(ConfigError::Invalid(
                "cart.max_quantity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Builds the formatter for this configuration's currency settings.
    pub fn formatter(&self) -> ConfigResult<CurrencyFormatter> {
        Ok(CurrencyFormatter::new(self.currency.clone())?)
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(symbol) = lookup("TICKETS_CURRENCY_SYMBOL") {
            debug!(symbol = %symbol, "Overriding currency symbol from environment");
            self.currency.symbol = symbol;
        }

        if let Some(position) = lookup("TICKETS_CURRENCY_POSITION") {
            match position.parse() {
                Ok(parsed) => self.currency.position = parsed,
                Err(_) => warn!(position = %position, "Unknown currency position in environment"),
            }
        }

        if let Some(separator) = lookup("TICKETS_THOUSANDS_SEPARATOR") {
            self.currency.thousands_separator = separator;
        }

        if let Some(separator) = lookup("TICKETS_DECIMAL_SEPARATOR") {
            self.currency.decimal_separator = separator;
        }

        if let Some(places) = lookup("TICKETS_CURRENCY_DECIMALS") {
            match places.parse::<u8>() {
                Ok(p) => self.currency.decimal_places = p,
                Err(_) => warn!(places = %places, "Invalid currency decimals in environment"),
            }
        }

        if let Some(max) = lookup("TICKETS_MAX_CART_ITEMS") {
            match max.parse::<usize>() {
                Ok(m) => {
                    debug!(max_items = m, "Overriding cart size limit from environment");
                    self.cart.max_items = m;
                }
                Err(_) => warn!(max = %max, "Invalid cart size limit in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "eventtickets", "checkout")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
