//! Configuration loading from config.toml.
//!
//! The engine itself holds no global state: the price catalog and the site
//! classification are loaded here once, turned into immutable lookup
//! structures (`PriceBook`, `SiteClassifier`) and injected into each
//! reconciliation call.

/// Product price catalog with per-site overrides
pub mod prices;

/// Known-site list and slaughterhouse classification
pub mod sites;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub use prices::ProductPriceConfig;
pub use sites::SitesConfig;

/// Configuration structure representing the entire config.toml file.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Product price catalog entries
    #[serde(default)]
    pub products: Vec<ProductPriceConfig>,
    /// Site catalog and classification
    #[serde(default)]
    pub sites: SitesConfig,
}

/// Loads engine configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads engine configuration from the default location (./config.toml).
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
