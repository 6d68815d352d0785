//! Normalized feed entries - the uniform in-memory shape every raw record
//! is converted into before aggregation.
//!
//! Raw feeds disagree on representation (composite-keyed maps vs record
//! lists, unsigned magnitudes vs signed totals); everything downstream of
//! the normalizer only ever sees `NormalizedEntry`.

use serde::{Deserialize, Serialize};

/// The four daily feeds the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    /// Stock counted at opening.
    StockMorning,
    /// Stock counted at close.
    StockEvening,
    /// Inter-site stock movements (signed).
    Transfer,
    /// Sales recorded at the till.
    Sale,
}

impl FeedKind {
    /// Short label used in log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StockMorning => "stock-morning",
            Self::StockEvening => "stock-evening",
            Self::Transfer => "transfers",
            Self::Sale => "sales",
        }
    }

    /// Whether entries of this feed carry a sign (only transfers do).
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Transfer)
    }
}

/// Direction of a transfer: stock arriving at the site or leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Stock arriving at the site (+1).
    Incoming,
    /// Stock leaving the site (-1).
    Outgoing,
}

impl Direction {
    /// Sign factor applied to magnitudes, +1.0 or -1.0.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Incoming => 1.0,
            Self::Outgoing => -1.0,
        }
    }

    /// Interprets a raw numeric direction field. Any negative value means
    /// outgoing; everything else (including a missing field parsed as 0)
    /// defaults to incoming.
    #[must_use]
    pub fn from_factor(raw: f64) -> Self {
        if raw < 0.0 { Self::Outgoing } else { Self::Incoming }
    }
}

/// A single normalized record: one (site, product) line of one feed.
///
/// `quantity` and `unit_price` are `None` when the raw record only carried a
/// monetary total; a quantity is never fabricated by dividing by an assumed
/// price. `total` is always present and signed (negative for outgoing
/// transfers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    /// Sales point the record belongs to.
    pub site: String,
    /// Product the record belongs to.
    pub product: String,
    /// Counted quantity, if known. Signed magnitude for transfers.
    pub quantity: Option<f64>,
    /// Unit price, if known or derivable.
    pub unit_price: Option<f64>,
    /// Monetary total, signed. Never NaN.
    pub total: f64,
    /// Free-text annotation carried over from the raw record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NormalizedEntry {
    /// Folds another record for the same (site, product) key into this one,
    /// as happens when a feed carries several lines for the same key on the
    /// same day (e.g. two transfer movements).
    ///
    /// Totals always sum. Quantities sum where known; an unknown quantity
    /// contributes nothing rather than poisoning the sum. The unit price is
    /// re-derived from the merged total and quantity.
    pub fn absorb(&mut self, other: &NormalizedEntry) {
        self.total += other.total;
        self.quantity = match (self.quantity, other.quantity) {
            (Some(a), Some(b)) => Some(a + b),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        self.unit_price = match self.quantity {
            Some(q) if q != 0.0 => Some(self.total / q),
            _ => None,
        };
        if self.comment.is_none() {
            self.comment.clone_from(&other.comment);
        }
    }
}
