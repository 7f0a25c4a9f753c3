//! # Configuration
//!
//! Store settings, simulated latency and checkout pricing, loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`NUTRI_*`)
//! 2. Config file (`nutri.toml`, or the path in `NUTRI_CONFIG`)
//! 3. Defaults (this file)
//!
//! ## Example `nutri.toml`
//! ```toml
//! data_dir = "/var/lib/nutrihealth"
//! payment_success_rate = 0.9
//!
//! [latency]
//! standard_ms = 500
//! session_ms = 200
//! payment_ms = 2000
//!
//! [shipping]
//! free_shipping_threshold = 100.0
//! flat_rate = 9.99
//!
//! [store]
//! storeName = "NutriHealth"
//! taxRate = 8.0
//! ```
//!
//! The `[store]` table uses the same camelCase keys as the admin settings
//! page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;

use nutri_core::checkout::PricingRules;
use nutri_core::validation::{validate_email, validate_person_name, validate_tax_percentage};
use nutri_core::{Money, ProductFilters, TaxRate, ValidationErrors};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "nutri.toml";

// =============================================================================
// Store Settings
// =============================================================================

/// The admin settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub store_name: String,
    pub store_email: String,
    pub store_phone: String,
    pub store_address: String,
    /// ISO 4217 code.
    pub currency: String,
    pub enable_reviews: bool,
    pub enable_wishlist: bool,
    /// Accept orders without a session. Off by default.
    pub enable_guest_checkout: bool,
    /// Percent, e.g. `8.0`.
    pub tax_rate: f64,
    /// List products with no stock in the catalog.
    pub show_out_of_stock: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            store_name: "NutriHealth".to_string(),
            store_email: "support@nutrihealth.com".to_string(),
            store_phone: "+1 (555) 123-4567".to_string(),
            store_address: "123 Health Street, Wellness City, WC 12345".to_string(),
            currency: "USD".to_string(),
            enable_reviews: true,
            enable_wishlist: true,
            enable_guest_checkout: false,
            tax_rate: 8.0,
            show_out_of_stock: true,
        }
    }
}

impl StoreSettings {
    /// Checks the settings form, reporting every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_person_name(&self.store_name));
        errors.check(validate_email(&self.store_email));
        errors.check(validate_tax_percentage(self.tax_rate));
        errors.into_result()
    }

    /// The products page filter panel seeded from `query`, with products out
    /// of stock hidden when the store says so.
    pub fn product_filters(&self, query: &str) -> ProductFilters {
        ProductFilters {
            hide_out_of_stock: !self.show_out_of_stock,
            ..ProductFilters::from_query(query)
        }
    }

    pub fn currency_symbol(&self) -> &str {
        match self.currency.as_str() {
            "USD" | "CAD" | "AUD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            other => other,
        }
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use nutri_storefront::config::StoreSettings;
    ///
    /// let settings = StoreSettings::default();
    /// assert_eq!(settings.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let whole = cents / 100;
        let frac = (cents % 100).abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol(),
            whole.abs(),
            frac
        )
    }
}

// =============================================================================
// Latency
// =============================================================================

/// Artificial delays of the API facade, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyProfile {
    /// Every endpoint without a more specific delay.
    pub standard_ms: u64,
    /// Login, logout and current-user lookups.
    pub session_ms: u64,
    /// Payment processing.
    pub payment_ms: u64,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        LatencyProfile {
            standard_ms: 500,
            session_ms: 200,
            payment_ms: 2000,
        }
    }
}

impl LatencyProfile {
    /// No delays at all (tests, scripted runs).
    pub const fn zero() -> Self {
        LatencyProfile {
            standard_ms: 0,
            session_ms: 0,
            payment_ms: 0,
        }
    }

    pub fn standard(&self) -> Duration {
        Duration::from_millis(self.standard_ms)
    }

    pub fn session(&self) -> Duration {
        Duration::from_millis(self.session_ms)
    }

    pub fn payment(&self) -> Duration {
        Duration::from_millis(self.payment_ms)
    }
}

// =============================================================================
// Shipping
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingSettings {
    /// Subtotal in dollars from which shipping is free.
    pub free_shipping_threshold: f64,
    /// Shipping charged below the threshold, in dollars.
    pub flat_rate: f64,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        ShippingSettings {
            free_shipping_threshold: 100.0,
            flat_rate: 9.99,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid store settings: {0}")]
    Settings(#[from] ValidationErrors),
}

/// Everything the storefront reads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where `FileStorage` keeps its keys. `None` uses the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,

    /// Probability in `[0, 1]` that a simulated payment succeeds.
    pub payment_success_rate: f64,

    pub latency: LatencyProfile,

    pub shipping: ShippingSettings,

    pub store: StoreSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            payment_success_rate: 0.9,
            latency: LatencyProfile::default(),
            shipping: ShippingSettings::default(),
            store: StoreSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the config file if present, then environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => AppConfig::from_file(&path)?,
            _ => AppConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            store = %config.store.store_name,
            tax_rate = config.store.tax_rate,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Reading config file");
        AppConfig::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies `NUTRI_*` overrides read through `lookup`.
    ///
    /// ## Environment Variables
    /// - `NUTRI_STORE_NAME`: store name
    /// - `NUTRI_DATA_DIR`: storage directory
    /// - `NUTRI_TAX_RATE`: tax rate in percent (e.g. "8.25")
    /// - `NUTRI_LATENCY_MS`: standard delay; `0` turns every delay off
    /// - `NUTRI_PAYMENT_SUCCESS_RATE`: `0.0` to `1.0`
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(name) = lookup("NUTRI_STORE_NAME") {
            self.store.store_name = name;
        }

        if let Some(dir) = lookup("NUTRI_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(rate) = lookup("NUTRI_TAX_RATE") {
            self.store.tax_rate = parse_var("NUTRI_TAX_RATE", &rate)?;
        }

        if let Some(ms) = lookup("NUTRI_LATENCY_MS") {
            let ms: u64 = parse_var("NUTRI_LATENCY_MS", &ms)?;
            if ms == 0 {
                self.latency = LatencyProfile::zero();
            } else {
                self.latency.standard_ms = ms;
            }
        }

        if let Some(rate) = lookup("NUTRI_PAYMENT_SUCCESS_RATE") {
            self.payment_success_rate = parse_var("NUTRI_PAYMENT_SUCCESS_RATE", &rate)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.payment_success_rate) {
            return Err(ConfigError::InvalidValue("payment_success_rate".to_string()));
        }
        self.store.validate()?;
        Ok(())
    }

    /// Checkout pricing derived from the shipping settings and store tax
    /// rate.
    pub fn pricing_rules(&self) -> PricingRules {
        pricing_rules(&self.shipping, &self.store)
    }

    /// The configured data directory, or the platform default.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.nutrihealth.storefront`
    /// - **Windows**: `%APPDATA%\nutrihealth\storefront\data`
    /// - **Linux**: `~/.local/share/storefront`
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }
}

/// Pricing for the given shipping settings and store tax rate.
pub fn pricing_rules(shipping: &ShippingSettings, store: &StoreSettings) -> PricingRules {
    PricingRules {
        free_shipping_threshold: Money::from_dollars(shipping.free_shipping_threshold),
        flat_shipping: Money::from_dollars(shipping.flat_rate),
        tax_rate: TaxRate::from_percentage(store.tax_rate),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "nutrihealth", "storefront")
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NUTRI_CONFIG") {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency() {
        let settings = StoreSettings::default();
        assert_eq!(settings.format_currency(1234), "$12.34");
        assert_eq!(settings.format_currency(100), "$1.00");
        assert_eq!(settings.format_currency(1), "$0.01");
        assert_eq!(settings.format_currency(-1234), "-$12.34");

        let euro = StoreSettings {
            currency: "EUR".to_string(),
            ..StoreSettings::default()
        };
        assert_eq!(euro.format_currency(999), "€9.99");
    }

    #[test]
    fn test_product_filters_follow_stock_visibility() {
        let shown = StoreSettings::default().product_filters("?category=Vitamins");
        assert!(!shown.hide_out_of_stock);
        assert_eq!(shown.categories, vec!["Vitamins".to_string()]);

        let hidden = StoreSettings {
            show_out_of_stock: false,
            ..StoreSettings::default()
        }
        .product_filters("?search=zinc");
        assert!(hidden.hide_out_of_stock);
        assert_eq!(hidden.search, "zinc");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.store.enable_guest_checkout);
        assert!(config.store.show_out_of_stock);
        assert_eq!(config.latency.standard(), Duration::from_millis(500));
        assert_eq!(config.pricing_rules(), PricingRules::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            payment_success_rate = 1.0

            [latency]
            payment_ms = 10

            [store]
            storeName = "Green Shelf"
            taxRate = 7.5
            "#,
        )
        .unwrap();

        assert_eq!(config.payment_success_rate, 1.0);
        assert_eq!(config.latency.payment_ms, 10);
        assert_eq!(config.latency.standard_ms, 500);
        assert_eq!(config.store.store_name, "Green Shelf");
        assert_eq!(config.store.currency, "USD");
        assert_eq!(config.pricing_rules().tax_rate, TaxRate::from_bps(750));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("NUTRI_STORE_NAME", "Env Store"),
                ("NUTRI_TAX_RATE", "8.25"),
                ("NUTRI_LATENCY_MS", "0"),
                ("NUTRI_DATA_DIR", "/tmp/nutri"),
            ]))
            .unwrap();

        assert_eq!(config.store.store_name, "Env Store");
        assert_eq!(config.pricing_rules().tax_rate, TaxRate::from_bps(825));
        assert_eq!(config.latency, LatencyProfile::zero());
        assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/nutri")));
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("NUTRI_PAYMENT_SUCCESS_RATE", "most")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for NUTRI_PAYMENT_SUCCESS_RATE");

        config.payment_success_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_validation() {
        let settings = StoreSettings {
            store_email: "nope".to_string(),
            tax_rate: 120.0,
            ..StoreSettings::default()
        };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
