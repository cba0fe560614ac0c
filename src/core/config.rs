use crate::core::currency::{ConversionError, ExchangeRateTable};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: f64,
}

impl Currency {
    fn new(code: &str, name: &str, symbol: &str, exchange_rate: f64) -> Self {
        Currency {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            exchange_rate,
        }
    }
}

fn default_base_currency() -> String {
    "USD".to_string()
}

/// Catalog shipped with the app, rates against USD.
pub fn default_currencies() -> Vec<Currency> {
    vec![
        Currency::new("USD", "US Dollar", "$", 1.0),
        Currency::new("EUR", "Euro", "€", 0.85),
        Currency::new("GBP", "British Pound", "£", 0.75),
        Currency::new("JPY", "Japanese Yen", "¥", 110.0),
        Currency::new("CAD", "Canadian Dollar", "C$", 1.25),
        Currency::new("AUD", "Australian Dollar", "A$", 1.35),
        Currency::new("CNY", "Chinese Yuan", "¥", 6.45),
        Currency::new("INR", "Indian Rupee", "₹", 74.5),
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<Currency>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            currencies: default_currencies(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in currencies",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "splitfx", "splitfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Builds the validated rate table from the configured catalog.
    pub fn rate_table(&self) -> std::result::Result<ExchangeRateTable, ConversionError> {
        ExchangeRateTable::new(
            &self.base_currency,
            self.currencies
                .iter()
                .map(|c| (c.code.as_str(), c.exchange_rate)),
        )
    }

    pub fn find_currency(&self, code: &str) -> Option<&Currency> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}
