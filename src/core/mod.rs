//! Core business logic - framework-agnostic normalization, aggregation,
//! reconciliation and report assembly. Everything here is pure computation
//! over in-memory data; transport, persistence and rendering live with the
//! calling collaborators.

/// Feed aggregation into per-site and per-product totals
pub mod aggregate;
/// Raw record normalization and tolerant numeric parsing
pub mod normalize;
/// Unit price resolution from the configured catalog
pub mod prices;
/// The reconciliation formulas
pub mod reconcile;
/// Report assembly and the top-level entry point
pub mod report;

pub use aggregate::FeedTotals;
pub use normalize::{NormalizeOutcome, normalize};
pub use prices::PriceBook;
pub use reconcile::calculate;
pub use report::{DailyFeeds, ReconciliationReport, parse_report_date, reconcile};
