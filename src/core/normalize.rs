//! Record normalization business logic.
//!
//! Converts raw feed records into `NormalizedEntry` values. Two raw shapes
//! exist in the wild and both are accepted for every feed kind: a JSON
//! object keyed by `"<site>-<product>"` composite strings (the stock
//! snapshots) and a JSON array of record objects carrying their own `site`
//! and `product` fields (transfers and sales). Shape detection lives here
//! and nowhere else.
//!
//! Normalization never fails: malformed records are skipped and counted,
//! unparseable numbers become 0.0, and NaN never reaches the aggregator.

use crate::core::prices::PriceBook;
use crate::entities::{Direction, FeedKind, NormalizedEntry};
use serde_json::{Map, Value};
use tracing::warn;

/// Result of normalizing one raw feed.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Successfully normalized entries, in feed order.
    pub entries: Vec<NormalizedEntry>,
    /// Count of records dropped for missing a site or product.
    pub skipped: usize,
}

/// Normalizes one raw feed into uniform entries.
///
/// `prices` back-fills totals for quantity-only records; an unknown product
/// leaves the total at 0.0 rather than inventing a price.
#[must_use]
pub fn normalize(raw: &Value, kind: FeedKind, prices: &PriceBook) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    match raw {
        Value::Object(records) => {
            for (key, value) in records {
                match (split_composite_key(key), value.as_object()) {
                    (Some((site, product)), Some(fields)) => {
                        outcome
                            .entries
                            .push(build_entry(site, product, fields, kind, prices));
                    }
                    _ => outcome.skipped += 1,
                }
            }
        }
        Value::Array(records) => {
            for record in records {
                match record.as_object().and_then(|fields| {
                    let site = nonempty_str(fields, "site")?;
                    let product = nonempty_str(fields, "product")?;
                    Some((site, product, fields))
                }) {
                    Some((site, product, fields)) => {
                        outcome
                            .entries
                            .push(build_entry(site, product, fields, kind, prices));
                    }
                    None => outcome.skipped += 1,
                }
            }
        }
        Value::Null => {}
        other => {
            warn!(
                "{} feed is neither a keyed map nor a record list: {other:?}",
                kind.label()
            );
        }
    }

    if outcome.skipped > 0 {
        warn!(
            "skipped {} malformed record(s) in the {} feed",
            outcome.skipped,
            kind.label()
        );
    }

    outcome
}

/// Splits a `"<site>-<product>"` composite key. Keys with no separator or
/// an empty half are malformed.
fn split_composite_key(key: &str) -> Option<(&str, &str)> {
    let (site, product) = key.split_once('-')?;
    let site = site.trim();
    let product = product.trim();
    if site.is_empty() || product.is_empty() {
        return None;
    }
    Some((site, product))
}

/// Reads a non-empty string field from a record object.
fn nonempty_str<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    let value = fields.get(name)?.as_str()?.trim();
    if value.is_empty() { None } else { Some(value) }
}

/// Builds one normalized entry, completing whichever of quantity, unit
/// price and total the raw record left out.
fn build_entry(
    site: &str,
    product: &str,
    fields: &Map<String, Value>,
    kind: FeedKind,
    prices: &PriceBook,
) -> NormalizedEntry {
    let quantity = numeric_field(fields, "quantity");
    let mut unit_price = numeric_field(fields, "unitPrice");
    let mut total = numeric_field(fields, "total");

    let direction = if kind.is_signed() {
        Direction::from_factor(numeric_field(fields, "direction").unwrap_or(1.0))
    } else {
        Direction::Incoming
    };

    match (quantity, unit_price, total) {
        // Total and quantity known: back-derive the unit price. A zero
        // quantity leaves the price undefined rather than dividing by zero.
        (Some(q), None, Some(t)) => {
            if q != 0.0 {
                unit_price = Some((t / q).abs());
            }
        }
        // Quantity and price known: derive the total.
        (Some(q), Some(p), None) => {
            total = Some(q * p);
        }
        // Quantity only: back-fill the price from the catalog. An unknown
        // product keeps the price undefined and the total at zero.
        (Some(q), None, None) => {
            if prices.is_known(product) {
                let p = prices.resolve(product, Some(site));
                unit_price = Some(p);
                total = Some(q * p);
            }
        }
        _ => {}
    }

    let mut total = total.unwrap_or(0.0);
    if kind.is_signed() {
        total = apply_direction(total, direction);
    }

    NormalizedEntry {
        site: site.to_string(),
        product: product.to_string(),
        quantity,
        unit_price,
        total,
        comment: fields
            .get("comment")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// An unsigned raw total gets the direction's sign; an already-signed total
/// is left alone.
fn apply_direction(total: f64, direction: Direction) -> f64 {
    if direction == Direction::Outgoing && total > 0.0 {
        -total
    } else {
        total
    }
}

/// Reads a numeric field, tolerating string-encoded numbers. Present but
/// unparseable values become 0.0; absent or null fields stay absent.
fn numeric_field(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_amount(value)),
    }
}

/// Parses a JSON value into a finite f64. A value that cannot be parsed is
/// a silent zero, never NaN, so one bad cell cannot poison a whole report.
#[must_use]
pub fn parse_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount_str(s),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            warn!("unparseable numeric value {value:?}, treating as 0");
            0.0
        }
    }
}

/// Parses a locale-formatted amount string.
///
/// Spaces, non-breaking spaces and apostrophes are thousand separators.
/// When both `,` and `.` appear, whichever comes last is the decimal point.
/// A lone comma is a decimal comma (the source data is French-locale, where
/// thousands are space-separated); repeated commas are thousand separators.
fn parse_amount_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '\''))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let cleaned = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned
            .chars()
            .filter(|&c| c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
        (Some(_), Some(_)) => cleaned.chars().filter(|&c| c != ',').collect(),
        (Some(_), None) if cleaned.matches(',').count() > 1 => {
            cleaned.chars().filter(|&c| c != ',').collect()
        }
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{init_test_tracing, test_price_book};
    use serde_json::json;

    #[test]
    fn test_parse_amount_str_locale_variants() {
        assert_eq!(parse_amount_str("1 234 567,89"), Some(1_234_567.89));
        assert_eq!(parse_amount_str("1\u{a0}234"), Some(1234.0));
        assert_eq!(parse_amount_str("1,234,567.89"), Some(1_234_567.89));
        assert_eq!(parse_amount_str("1.234.567,89"), Some(1_234_567.89));
        assert_eq!(parse_amount_str("12,5"), Some(12.5));
        assert_eq!(parse_amount_str("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_amount_str("1'250.75"), Some(1250.75));
        assert_eq!(parse_amount_str("-4 222 800"), Some(-4_222_800.0));
        assert_eq!(parse_amount_str("garbage"), None);
        assert_eq!(parse_amount_str(""), None);
    }

    #[test]
    fn test_parse_amount_never_produces_nan() {
        init_test_tracing();
        assert_eq!(parse_amount(&json!("not a number")), 0.0);
        assert_eq!(parse_amount(&json!(true)), 0.0);
        assert_eq!(parse_amount(&json!({})), 0.0);
    }

    #[test]
    fn test_normalize_composite_keyed_map() {
        let raw = json!({
            "Main Counter-beef": { "quantity": 10.0, "unitPrice": 2500.0 },
            "Harbour Stall-mutton": { "total": 6700.0, "quantity": 2.0 },
        });

        let outcome = normalize(&raw, FeedKind::StockMorning, &test_price_book());
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.entries.len(), 2);

        let beef = outcome
            .entries
            .iter()
            .find(|e| e.product == "beef")
            .unwrap();
        assert_eq!(beef.site, "Main Counter");
        assert_eq!(beef.total, 25_000.0);

        // Unit price back-derived from total / quantity.
        let mutton = outcome
            .entries
            .iter()
            .find(|e| e.product == "mutton")
            .unwrap();
        assert_eq!(mutton.unit_price, Some(3350.0));
    }

    #[test]
    fn test_normalize_record_list() {
        let raw = json!([
            { "site": "Main Counter", "product": "beef", "quantity": 4.0, "unitPrice": 2500.0 },
            { "site": "Harbour Stall", "product": "pork", "total": "1 800,50" },
        ]);

        let outcome = normalize(&raw, FeedKind::Sale, &test_price_book());
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.entries[0].total, 10_000.0);
        assert_eq!(outcome.entries[1].total, 1800.5);
        // Total-only record: no quantity is fabricated.
        assert_eq!(outcome.entries[1].quantity, None);
        assert_eq!(outcome.entries[1].unit_price, None);
    }

    #[test]
    fn test_normalize_skips_malformed_records() {
        init_test_tracing();
        let map = json!({
            "nosite": { "quantity": 1.0 },
            "Main Counter-beef": 42,
            "-beef": { "quantity": 1.0 },
            "Harbour Stall-pork": { "quantity": 1.0, "unitPrice": 1800.0 },
        });
        let outcome = normalize(&map, FeedKind::StockEvening, &test_price_book());
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.entries.len(), 1);

        let list = json!([
            { "product": "beef", "quantity": 1.0 },
            { "site": "", "product": "beef", "quantity": 1.0 },
            { "site": "Main Counter", "product": "beef", "quantity": 1.0 },
            "not a record",
        ]);
        let outcome = normalize(&list, FeedKind::Sale, &test_price_book());
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.entries.len(), 1);
    }

    #[test]
    fn test_quantity_only_record_backfills_from_catalog() {
        let raw = json!([
            { "site": "Harbour Stall", "product": "mutton", "quantity": 2.0 },
            { "site": "Harbour Stall", "product": "ostrich", "quantity": 2.0 },
        ]);

        let outcome = normalize(&raw, FeedKind::Sale, &test_price_book());
        // Site override applies: 2 x 3350, not 2 x 3200.
        assert_eq!(outcome.entries[0].total, 6700.0);
        assert_eq!(outcome.entries[0].unit_price, Some(3350.0));
        // Unknown product: no price invented, total stays zero.
        assert_eq!(outcome.entries[1].total, 0.0);
        assert_eq!(outcome.entries[1].unit_price, None);
    }

    #[test]
    fn test_transfer_total_carries_direction_sign() {
        let raw = json!([
            // Unsigned total with outgoing direction gets negated.
            { "site": "Abattoir", "product": "beef", "total": 4_222_800.0, "direction": -1 },
            // Already-signed total is left alone.
            { "site": "Abattoir", "product": "pork", "total": -500.0, "direction": -1 },
            // Derived total picks up the sign too.
            { "site": "Main Counter", "product": "beef", "quantity": 2.0, "unitPrice": 100.0, "direction": -1 },
            // Incoming stays positive.
            { "site": "Main Counter", "product": "pork", "quantity": 2.0, "unitPrice": 100.0, "direction": 1 },
        ]);

        let outcome = normalize(&raw, FeedKind::Transfer, &test_price_book());
        assert_eq!(outcome.entries[0].total, -4_222_800.0);
        assert_eq!(outcome.entries[1].total, -500.0);
        assert_eq!(outcome.entries[2].total, -200.0);
        assert_eq!(outcome.entries[3].total, 200.0);
    }

    #[test]
    fn test_negative_transfer_quantity_is_not_clamped() {
        let raw = json!([
            { "site": "Abattoir", "product": "beef", "quantity": -5.0, "unitPrice": 100.0 },
        ]);

        let outcome = normalize(&raw, FeedKind::Transfer, &test_price_book());
        assert_eq!(outcome.entries[0].quantity, Some(-5.0));
        assert_eq!(outcome.entries[0].total, -500.0);
    }

    #[test]
    fn test_direction_is_ignored_outside_transfer_feeds() {
        let raw = json!([
            { "site": "Main Counter", "product": "beef", "quantity": 2.0, "unitPrice": 100.0, "direction": -1 },
        ]);
        let outcome = normalize(&raw, FeedKind::Sale, &test_price_book());
        assert_eq!(outcome.entries[0].total, 200.0);
    }

    #[test]
    fn test_null_feed_is_empty() {
        let outcome = normalize(&Value::Null, FeedKind::Sale, &test_price_book());
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_unparseable_quantity_becomes_zero_not_nan() {
        let raw = json!([
            { "site": "Main Counter", "product": "beef", "quantity": "???", "unitPrice": 2500.0 },
        ]);
        let outcome = normalize(&raw, FeedKind::Sale, &test_price_book());
        assert_eq!(outcome.entries[0].quantity, Some(0.0));
        assert_eq!(outcome.entries[0].total, 0.0);
        assert!(outcome.entries[0].total.is_finite());
    }
}
