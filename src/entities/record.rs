//! Reconciliation output records.
//!
//! A `ReconciliationRecord` is derived entirely from the day's four feeds and
//! never persisted; the engine recomputes it on every request. Serialized
//! field names are camelCase to match the wire shape consumed by the
//! reporting frontend.

use serde::{Deserialize, Serialize};

/// Reconciliation result for one site (or one product within a site).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRecord {
    /// Value of stock counted at opening.
    pub stock_morning: f64,
    /// Value of stock counted at close.
    pub stock_evening: f64,
    /// Net signed value of transfers (outgoing movements are negative).
    pub transfers: f64,
    /// Stock consumed according to the stock-ledger identity:
    /// morning - evening + transfers.
    pub theoretical_sales: f64,
    /// Sales actually recorded at the till.
    pub recorded_sales: f64,
    /// Reconciliation gap: theoretical minus recorded.
    pub variance: f64,
    /// Percentage metric for the gap. `None` when the formula's denominator
    /// is zero; consumers render "N/A" and show `comment`.
    pub variance_percent: Option<f64>,
    /// Explanation attached whenever `variance_percent` is `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ReconciliationRecord {
    /// An all-zero record for a site with no movement today. The retail
    /// zero-theoretical convention applies, so the percentage is unavailable
    /// rather than a misleading 0%.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            stock_morning: 0.0,
            stock_evening: 0.0,
            transfers: 0.0,
            theoretical_sales: 0.0,
            recorded_sales: 0.0,
            variance: 0.0,
            variance_percent: None,
            comment: Some("no movement recorded for this site today".to_string()),
        }
    }
}

/// One row of the report summary: a site name plus its aggregated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Sales point this row aggregates.
    pub site: String,
    /// Aggregated reconciliation figures for the site.
    #[serde(flatten)]
    pub record: ReconciliationRecord,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_serializes_camel_case_and_flattens_summary_row() {
        let row = SummaryRow {
            site: "Main Counter".to_string(),
            record: ReconciliationRecord {
                stock_morning: 100.0,
                stock_evening: 40.0,
                transfers: -10.0,
                theoretical_sales: 50.0,
                recorded_sales: 45.0,
                variance: 5.0,
                variance_percent: Some(10.0),
                comment: None,
            },
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["site"], "Main Counter");
        assert_eq!(json["stockMorning"], 100.0);
        assert_eq!(json["variancePercent"], 10.0);
        // Absent comments are omitted entirely, not serialized as null.
        assert!(json.get("comment").is_none());
    }

    #[test]
    fn test_null_percent_serializes_as_null_with_comment() {
        let record = ReconciliationRecord::empty();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["variancePercent"].is_null());
        assert!(json["comment"].is_string());
    }
}
