//! Product price catalog configuration.
//!
//! Each `[[products]]` entry carries a default unit price and an optional
//! table of per-site overrides. Prices are only a fallback: they back-fill
//! totals for quantity-only records, so an incomplete catalog degrades the
//! report instead of failing it.

use serde::Deserialize;
use std::collections::HashMap;

/// Configuration for a single product's pricing.
#[derive(Debug, Deserialize, Clone)]
pub struct ProductPriceConfig {
    /// Product name as it appears in the feeds
    pub name: String,
    /// Default unit price
    pub price: f64,
    /// Per-site price overrides, keyed by site name
    #[serde(default)]
    pub overrides: HashMap<String, f64>,
}
