//! Feed aggregation business logic.
//!
//! Sums normalized entries into per-site per-product tables, per-site totals
//! and a grand total for one feed. Duplicate (site, product) keys are folded
//! together, as happens when a feed carries several lines for the same key
//! on the same day.
//!
//! Site and product order is insertion order from the normalizer. The report
//! contract requires feed order rather than alphabetical order, so the
//! tables are kept as vectors with a side index instead of sorted maps.

use crate::entities::NormalizedEntry;
use std::collections::HashMap;

/// Aggregated entries for a single site, products in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SiteAggregate {
    site: String,
    products: Vec<NormalizedEntry>,
    index: HashMap<String, usize>,
    total: f64,
}

impl SiteAggregate {
    fn new(site: &str) -> Self {
        Self {
            site: site.to_string(),
            ..Self::default()
        }
    }

    fn push(&mut self, entry: NormalizedEntry) {
        self.total += entry.total;
        match self.index.get(&entry.product) {
            Some(&at) => self.products[at].absorb(&entry),
            None => {
                self.index.insert(entry.product.clone(), self.products.len());
                self.products.push(entry);
            }
        }
    }

    /// Site this aggregate belongs to.
    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Signed sum of product totals; transfer outflows reduce it.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Merged entries in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &NormalizedEntry> {
        self.products.iter()
    }

    /// Looks up the merged entry for one product.
    #[must_use]
    pub fn product(&self, name: &str) -> Option<&NormalizedEntry> {
        self.index.get(name).map(|&at| &self.products[at])
    }

    /// Total for one product, 0.0 when the product is absent.
    #[must_use]
    pub fn product_total(&self, name: &str) -> f64 {
        self.product(name).map_or(0.0, |entry| entry.total)
    }
}

/// Aggregated view of one feed: sites in insertion order, each holding its
/// merged per-product entries.
#[derive(Debug, Clone, Default)]
pub struct FeedTotals {
    sites: Vec<SiteAggregate>,
    index: HashMap<String, usize>,
}

impl FeedTotals {
    /// Aggregates normalized entries. Entries for an already-seen
    /// (site, product) key are summed rather than duplicated.
    #[must_use]
    pub fn from_entries(entries: Vec<NormalizedEntry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.push(entry);
        }
        totals
    }

    fn push(&mut self, entry: NormalizedEntry) {
        let at = match self.index.get(&entry.site) {
            Some(&at) => at,
            None => {
                self.index.insert(entry.site.clone(), self.sites.len());
                self.sites.push(SiteAggregate::new(&entry.site));
                self.sites.len() - 1
            }
        };
        self.sites[at].push(entry);
    }

    /// Site aggregates in insertion order.
    pub fn sites(&self) -> impl Iterator<Item = &SiteAggregate> {
        self.sites.iter()
    }

    /// Looks up one site's aggregate.
    #[must_use]
    pub fn site(&self, name: &str) -> Option<&SiteAggregate> {
        self.index.get(name).map(|&at| &self.sites[at])
    }

    /// Signed total for one site, 0.0 when the site is absent from the feed.
    #[must_use]
    pub fn site_total(&self, name: &str) -> f64 {
        self.site(name).map_or(0.0, SiteAggregate::total)
    }

    /// Total for one (site, product) key, 0.0 when absent.
    #[must_use]
    pub fn product_total(&self, site: &str, product: &str) -> f64 {
        self.site(site).map_or(0.0, |s| s.product_total(product))
    }

    /// Sum of all site totals.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.sites.iter().map(SiteAggregate::total).sum()
    }
}
