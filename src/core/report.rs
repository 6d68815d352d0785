//! Report assembly and the top-level reconciliation entry point.
//!
//! Shapes the calculator's output into a summary (one row per site) and a
//! detail drill-down (per site, per product), and wires the whole chain
//! together: normalize each feed, aggregate it, reconcile every site and
//! product, assemble the report. The entry point is a pure function of its
//! inputs; callers own caching, transport and rendering.

use crate::config::sites::SiteClassifier;
use crate::core::aggregate::FeedTotals;
use crate::core::normalize::normalize;
use crate::core::prices::PriceBook;
use crate::core::reconcile::calculate;
use crate::entities::{FeedKind, ReconciliationRecord, SummaryRow};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde::ser::SerializeMap;
use std::collections::HashSet;
use tracing::{info, warn};

/// The four raw feeds for one reconciliation date, already materialized by
/// the calling collaborator. The engine performs no I/O for feed data.
#[derive(Debug, Clone, Default)]
pub struct DailyFeeds {
    /// Stock counted at opening, usually a `"<site>-<product>"` keyed map.
    pub stock_morning: serde_json::Value,
    /// Stock counted at close, same shape as the morning snapshot.
    pub stock_evening: serde_json::Value,
    /// Inter-site movements, usually a list of signed records.
    pub transfers: serde_json::Value,
    /// Till sales, usually a list of records.
    pub sales: serde_json::Value,
}

/// Per-product breakdown for one site, products in feed order.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteDetail {
    site: String,
    products: Vec<(String, ReconciliationRecord)>,
}

impl SiteDetail {
    /// Site this breakdown belongs to.
    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Product records in feed order.
    pub fn products(&self) -> impl Iterator<Item = (&str, &ReconciliationRecord)> {
        self.products
            .iter()
            .map(|(product, record)| (product.as_str(), record))
    }

    /// Looks up one product's record.
    #[must_use]
    pub fn record(&self, product: &str) -> Option<&ReconciliationRecord> {
        self.products
            .iter()
            .find(|(name, _)| name == product)
            .map(|(_, record)| record)
    }
}

/// Ordered site -> product -> record table, serialized as nested JSON maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailTable {
    sites: Vec<SiteDetail>,
}

impl DetailTable {
    /// Site breakdowns in report order.
    pub fn sites(&self) -> impl Iterator<Item = &SiteDetail> {
        self.sites.iter()
    }

    /// Looks up one site's breakdown.
    #[must_use]
    pub fn site(&self, name: &str) -> Option<&SiteDetail> {
        self.sites.iter().find(|detail| detail.site == name)
    }

    /// Looks up one (site, product) record.
    #[must_use]
    pub fn record(&self, site: &str, product: &str) -> Option<&ReconciliationRecord> {
        self.site(site).and_then(|detail| detail.record(product))
    }
}

impl Serialize for DetailTable {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sites.len()))?;
        for detail in &self.sites {
            map.serialize_entry(&detail.site, &ProductMap(&detail.products))?;
        }
        map.end()
    }
}

/// Serializes a product list as a JSON map in list order.
struct ProductMap<'a>(&'a [(String, ReconciliationRecord)]);

impl Serialize for ProductMap<'_> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (product, record) in self.0 {
            map.serialize_entry(product, record)?;
        }
        map.end()
    }
}

/// The assembled reconciliation report: a summary row per site plus the
/// per-product drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ReconciliationReport {
    /// One aggregated row per site, in report order.
    pub resume: Vec<SummaryRow>,
    /// Per-site per-product breakdown for UI drill-down.
    pub details: DetailTable,
}

/// Reconciles the four feeds for one date into a report.
///
/// Pure and synchronous: no I/O, no retained state, caller-supplied values
/// are never mutated. Worst case on bad input data is a degraded (partial)
/// report, never a crash.
///
/// # Errors
/// Propagates `Error::EmptySite` from the calculator; the normalizer already
/// filters unattributable records, so this only fires on misuse.
pub fn reconcile(
    feeds: &DailyFeeds,
    prices: &PriceBook,
    classifier: &SiteClassifier,
) -> Result<ReconciliationReport> {
    let morning = normalize(&feeds.stock_morning, FeedKind::StockMorning, prices);
    let evening = normalize(&feeds.stock_evening, FeedKind::StockEvening, prices);
    let transfers = normalize(&feeds.transfers, FeedKind::Transfer, prices);
    let sales = normalize(&feeds.sales, FeedKind::Sale, prices);

    let skipped = morning.skipped + evening.skipped + transfers.skipped + sales.skipped;
    if skipped > 0 {
        warn!("{skipped} record(s) skipped across all feeds, report is partial");
    }

    assemble(
        classifier,
        &FeedTotals::from_entries(morning.entries),
        &FeedTotals::from_entries(evening.entries),
        &FeedTotals::from_entries(transfers.entries),
        &FeedTotals::from_entries(sales.entries),
    )
}

/// Assembles aggregated feed totals into the summary + detail report.
///
/// Site order is feed discovery order (morning, evening, transfers, sales);
/// configured sites with no movement today are appended with all-zero
/// records instead of being dropped. Product order within a site is feed
/// order as well.
///
/// # Errors
/// Propagates `Error::EmptySite` from the calculator.
pub fn assemble(
    classifier: &SiteClassifier,
    stock_morning: &FeedTotals,
    stock_evening: &FeedTotals,
    transfers: &FeedTotals,
    sales: &FeedTotals,
) -> Result<ReconciliationReport> {
    let feeds = [stock_morning, stock_evening, transfers, sales];

    let mut site_order: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for feed in feeds {
        for aggregate in feed.sites() {
            if seen.insert(aggregate.site()) {
                site_order.push(aggregate.site());
            }
        }
    }
    for site in classifier.known_sites() {
        if seen.insert(site.as_str()) {
            site_order.push(site.as_str());
        }
    }

    let mut resume = Vec::with_capacity(site_order.len());
    let mut details = Vec::with_capacity(site_order.len());

    for site in site_order {
        let category = classifier.classify(site);
        let active = feeds.iter().any(|feed| feed.site(site).is_some());

        let record = if active {
            calculate(
                site,
                category,
                stock_morning.site_total(site),
                stock_evening.site_total(site),
                transfers.site_total(site),
                sales.site_total(site),
            )?
        } else {
            ReconciliationRecord::empty()
        };
        resume.push(SummaryRow {
            site: site.to_string(),
            record,
        });

        let mut products: Vec<(String, ReconciliationRecord)> = Vec::new();
        let mut seen_products: HashSet<&str> = HashSet::new();
        for feed in feeds {
            let Some(aggregate) = feed.site(site) else {
                continue;
            };
            for entry in aggregate.products() {
                if seen_products.insert(entry.product.as_str()) {
                    let record = calculate(
                        site,
                        category,
                        stock_morning.product_total(site, &entry.product),
                        stock_evening.product_total(site, &entry.product),
                        transfers.product_total(site, &entry.product),
                        sales.product_total(site, &entry.product),
                    )?;
                    products.push((entry.product.clone(), record));
                }
            }
        }

        details.push(SiteDetail {
            site: site.to_string(),
            products,
        });
    }

    info!("assembled reconciliation report for {} site(s)", resume.len());

    Ok(ReconciliationReport {
        resume,
        details: DetailTable { sites: details },
    })
}

/// Parses a report date in the `DD-MM-YYYY` format the HTTP wrapper passes
/// through.
///
/// # Errors
/// Returns `Error::InvalidDate` for anything chrono cannot parse.
pub fn parse_report_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d-%m-%Y").map_err(|e| Error::InvalidDate {
        value: value.to_string(),
        message: e.to_string(),
    })
}
