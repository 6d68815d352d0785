//! Site classification.
//!
//! Ordinary retail counters and the slaughterhouse use different percentage
//! formulas. The classification is a closed, site-name-keyed set injected
//! from configuration; it is not derivable from the feeds themselves.

use serde::{Deserialize, Serialize};

/// Category a site belongs to, selecting its variance-percentage formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SiteCategory {
    /// Ordinary sales point: variance relative to theoretical sales.
    #[default]
    Retail,
    /// Slaughterhouse: fraction of morning stock depleted. A different
    /// metric entirely, not an edge case of the retail formula.
    Slaughterhouse,
}
