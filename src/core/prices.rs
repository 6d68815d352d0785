//! Price resolution business logic.
//!
//! Resolves a unit price for a product, preferring a site-specific override
//! over the catalog default. Lookups never fail: an unknown product resolves
//! to 0.0 and callers fall back to the record's supplied total instead of
//! quantity times price. `is_known` lets callers tell "priced at 0" apart
//! from "not a recognized product".

use crate::config::ProductPriceConfig;
use std::collections::HashMap;

/// Immutable price lookup table built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    defaults: HashMap<String, f64>,
    /// product -> site -> price
    overrides: HashMap<String, HashMap<String, f64>>,
}

impl PriceBook {
    /// Builds a price book from the `[[products]]` configuration entries.
    #[must_use]
    pub fn from_config(products: &[ProductPriceConfig]) -> Self {
        let mut defaults = HashMap::new();
        let mut overrides: HashMap<String, HashMap<String, f64>> = HashMap::new();

        for product in products {
            defaults.insert(product.name.clone(), product.price);
            if !product.overrides.is_empty() {
                overrides.insert(product.name.clone(), product.overrides.clone());
            }
        }

        Self {
            defaults,
            overrides,
        }
    }

    /// Resolves the unit price for a product, preferring a site-specific
    /// override when `site` is given. Unknown products resolve to 0.0.
    #[must_use]
    pub fn resolve(&self, product: &str, site: Option<&str>) -> f64 {
        if let Some(site) = site
            && let Some(site_prices) = self.overrides.get(product)
            && let Some(price) = site_prices.get(site)
        {
            return *price;
        }

        self.defaults.get(product).copied().unwrap_or(0.0)
    }

    /// Whether the product exists in the catalog at all.
    #[must_use]
    pub fn is_known(&self, product: &str) -> bool {
        self.defaults.contains_key(product)
    }
}
