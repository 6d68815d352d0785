//! Reconciliation calculation business logic.
//!
//! Applies the stock-ledger identity to one site's (or one product's)
//! aggregated totals and produces a `ReconciliationRecord`:
//!
//!   theoretical_sales = stock_morning - stock_evening + transfers
//!   variance          = theoretical_sales - recorded_sales
//!
//! The percentage metric depends on the site category. Ordinary retail
//! sites report the variance relative to theoretical sales. The
//! slaughterhouse reports the fraction of morning stock depleted, a
//! different metric entirely, used there as a yield/wastage figure.
//!
//! Numeric edge cases never error: a zero denominator yields a `None`
//! percentage with an explanatory comment so consumers can render "N/A".
//! The only error condition is an empty site name, since every record must
//! be attributable to a site.

use crate::entities::{ReconciliationRecord, SiteCategory};
use crate::errors::{Error, Result};

impl SiteCategory {
    /// Computes the category's percentage metric, together with the comment
    /// explaining an unavailable result.
    fn variance_percent(
        self,
        stock_morning: f64,
        theoretical_sales: f64,
        variance: f64,
    ) -> (Option<f64>, Option<String>) {
        match self {
            Self::Retail => {
                if theoretical_sales == 0.0 {
                    (
                        None,
                        Some("theoretical sales are zero, variance percentage is not defined".to_string()),
                    )
                } else {
                    (Some((variance / theoretical_sales) * 100.0), None)
                }
            }
            Self::Slaughterhouse => {
                if stock_morning == 0.0 {
                    (
                        None,
                        Some("stock morning is zero, calculation not possible".to_string()),
                    )
                } else {
                    (Some((theoretical_sales / stock_morning) * 100.0), None)
                }
            }
        }
    }
}

/// Reconciles one site's aggregated totals into a record.
///
/// Pure: identical inputs always produce identical output.
///
/// # Errors
/// Returns `Error::EmptySite` when `site` is empty or whitespace; numeric
/// edge cases are handled, never propagated as errors.
pub fn calculate(
    site: &str,
    category: SiteCategory,
    stock_morning: f64,
    stock_evening: f64,
    transfers: f64,
    recorded_sales: f64,
) -> Result<ReconciliationRecord> {
    if site.trim().is_empty() {
        return Err(Error::EmptySite);
    }

    let theoretical_sales = stock_morning - stock_evening + transfers;
    let variance = theoretical_sales - recorded_sales;
    let (variance_percent, comment) =
        category.variance_percent(stock_morning, theoretical_sales, variance);

    Ok(ReconciliationRecord {
        stock_morning,
        stock_evening,
        transfers,
        theoretical_sales,
        recorded_sales,
        variance,
        variance_percent,
        comment,
    })
}
