//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_DATA_DIR` - Directory for the durable mirror (default: .valoisa)
//! - `STOREFRONT_CART_KEY` - Storage key for the cart (default: `valoisa_cart`)
//! - `STOREFRONT_SHIPPING_FEE` - Flat shipping fee (default: 2.50)
//! - `STOREFRONT_CHECKOUT_DELAY_MS` - Delay before the view resets after checkout (default: 1500)
//! - `STOREFRONT_CURRENCY` - ISO 4217 display currency (default: EUR)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use valoisa_core::CurrencyCode;

use crate::storage::keys;

const DEFAULT_DATA_DIR: &str = ".valoisa";
const DEFAULT_SHIPPING_FEE: &str = "2.50";
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 1500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the file-backed durable mirror
    pub data_dir: PathBuf,
    /// Cart behavior settings
    pub cart: CartSettings,
}

/// Settings the cart manager runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Key the cart is mirrored under
    pub storage_key: String,
    /// Flat shipping fee charged unless shipping is waived
    pub shipping_fee: Decimal,
    /// How long the checkout confirmation stays up before the view resets
    pub checkout_delay: Duration,
    /// Currency used when formatting amounts
    pub currency: CurrencyCode,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: keys::CART.to_string(),
            shipping_fee: Decimal::new(250, 2),
            checkout_delay: Duration::from_millis(DEFAULT_CHECKOUT_DELAY_MS),
            currency: CurrencyCode::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let data_dir = PathBuf::from(env.get_or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));

        let storage_key = env.get_or_default("STOREFRONT_CART_KEY", keys::CART);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let shipping_fee = env.parse_or_default::<Decimal>(
            "STOREFRONT_SHIPPING_FEE",
            DEFAULT_SHIPPING_FEE,
        )?;
        if shipping_fee < Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SHIPPING_FEE".to_string(),
                format!("must not be negative (got {shipping_fee})"),
            ));
        }

        let delay_ms = env.parse_or_default::<u64>(
            "STOREFRONT_CHECKOUT_DELAY_MS",
            &DEFAULT_CHECKOUT_DELAY_MS.to_string(),
        )?;

        let currency = env.parse_or_default::<CurrencyCode>("STOREFRONT_CURRENCY", "EUR")?;

        Ok(Self {
            data_dir,
            cart: CartSettings {
                storage_key,
                shipping_fee,
                checkout_delay: Duration::from_millis(delay_ms),
                currency,
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Get and parse an environment variable with a default value.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".valoisa"));
        assert_eq!(config.cart, CartSettings::default());
        assert_eq!(config.cart.storage_key, "valoisa_cart");
        assert_eq!(config.cart.shipping_fee, Decimal::new(250, 2));
        assert_eq!(config.cart.checkout_delay, Duration::from_millis(1500));
        assert_eq!(config.cart.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_DATA_DIR", "/tmp/shop"),
            ("STOREFRONT_CART_KEY", "cart"),
            ("STOREFRONT_SHIPPING_FEE", "4.90"),
            ("STOREFRONT_CHECKOUT_DELAY_MS", "10"),
            ("STOREFRONT_CURRENCY", "usd"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.cart.storage_key, "cart");
        assert_eq!(config.cart.shipping_fee, Decimal::new(490, 2));
        assert_eq!(config.cart.checkout_delay, Duration::from_millis(10));
        assert_eq!(config.cart.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_negative_shipping_fee_rejected() {
        let err = load(&[("STOREFRONT_SHIPPING_FEE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "STOREFRONT_SHIPPING_FEE"));
    }

    #[test]
    fn test_unparseable_values_rejected() {
        assert!(load(&[("STOREFRONT_SHIPPING_FEE", "free")]).is_err());
        assert!(load(&[("STOREFRONT_CHECKOUT_DELAY_MS", "soon")]).is_err());
        assert!(load(&[("STOREFRONT_CURRENCY", "SEK")]).is_err());
        assert!(load(&[("STOREFRONT_CART_KEY", "  ")]).is_err());
    }
}
