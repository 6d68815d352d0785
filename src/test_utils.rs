//! Shared test utilities.
//!
//! Common builders for price books, classifiers and raw feed fixtures with
//! sensible defaults, so individual tests only spell out what they exercise.

use crate::config::Config;
use crate::config::sites::{SiteClassifier, SitesConfig};
use crate::core::prices::PriceBook;
use crate::core::report::DailyFeeds;
use crate::entities::NormalizedEntry;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer tracing subscriber; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Standard test catalog:
/// * beef at 2500
/// * mutton at 3200, overridden to 3350 at Harbour Stall
/// * pork at 1800
#[must_use]
pub fn test_price_book() -> PriceBook {
    let config: Config = toml::from_str(
        r#"
        [[products]]
        name = "beef"
        price = 2500.0

        [[products]]
        name = "mutton"
        price = 3200.0
        overrides = { "Harbour Stall" = 3350.0 }

        [[products]]
        name = "pork"
        price = 1800.0
    "#,
    )
    .expect("test catalog parses");
    PriceBook::from_config(&config.products)
}

/// Standard test site catalog: Main Counter and Harbour Stall are retail,
/// Abattoir is the slaughterhouse.
#[must_use]
pub fn test_classifier() -> SiteClassifier {
    SiteClassifier::from_config(&SitesConfig {
        known: vec![
            "Main Counter".to_string(),
            "Harbour Stall".to_string(),
            "Abattoir".to_string(),
        ],
        slaughterhouses: vec!["Abattoir".to_string()],
    })
}

/// Builds a normalized entry with the given totals, for aggregator tests.
#[must_use]
pub fn entry(site: &str, product: &str, quantity: Option<f64>, total: f64) -> NormalizedEntry {
    NormalizedEntry {
        site: site.to_string(),
        product: product.to_string(),
        quantity,
        unit_price: match quantity {
            Some(q) if q != 0.0 => Some(total / q),
            _ => None,
        },
        total,
        comment: None,
    }
}

/// A full day of feeds exercising both raw shapes and both site categories:
/// * Main Counter (retail): morning 1 000 000, evening 200 000,
///   transfers +50 000, sales 800 000.
/// * Abattoir (slaughterhouse): morning 3 700 000, outgoing transfer
///   4 222 800, no evening stock, no sales.
/// * Harbour Stall: configured but idle today.
#[must_use]
pub fn sample_feeds() -> DailyFeeds {
    DailyFeeds {
        stock_morning: json!({
            "Main Counter-beef": { "total": 600_000.0, "quantity": 240.0 },
            "Main Counter-mutton": { "total": 400_000.0, "quantity": 125.0 },
            "Abattoir-beef": { "total": 3_700_000.0 },
        }),
        stock_evening: json!({
            "Main Counter-beef": { "total": 150_000.0, "quantity": 60.0 },
            "Main Counter-mutton": { "total": "50 000" },
        }),
        transfers: json!([
            {
                "site": "Main Counter",
                "product": "beef",
                "total": 50_000.0,
                "direction": 1,
                "comment": "restock from cold room"
            },
            {
                "site": "Abattoir",
                "product": "beef",
                "total": 4_222_800.0,
                "direction": -1
            },
        ]),
        sales: json!([
            { "site": "Main Counter", "product": "beef", "total": 500_000.0 },
            { "site": "Main Counter", "product": "mutton", "total": 300_000.0 },
        ]),
    }
}
