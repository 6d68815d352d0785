//! Report caching layer.
//!
//! Reconciliation is recomputed from the raw feeds on every request; for
//! month-level dashboards that gets expensive, so callers can memoize
//! assembled reports here per (year, month) key. The cache sits outside the
//! engine and treats it as a pure function: staleness policy (time-based
//! expiry, force recompute, explicit invalidation) is entirely a caller
//! concern and never leaks into the computation.

use crate::core::report::ReconciliationReport;
use crate::errors::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, trace};

/// Default time-to-live for cached reports.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CachedReport {
    report: Arc<ReconciliationReport>,
    computed_at: Instant,
}

/// Memoizes assembled reports per (year, month) with a time-based expiry.
pub struct ReportCache {
    ttl: Duration,
    entries: RwLock<HashMap<(i32, u32), CachedReport>>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ReportCache {
    /// Creates a cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached report for (year, month), or runs `compute` and
    /// caches its result. `force` bypasses a fresh cache entry and
    /// recomputes unconditionally.
    ///
    /// # Errors
    /// Propagates errors from `compute`; a failed computation is not cached.
    pub async fn get_or_compute<F>(
        &self,
        year: i32,
        month: u32,
        force: bool,
        compute: F,
    ) -> Result<Arc<ReconciliationReport>>
    where
        F: FnOnce() -> Result<ReconciliationReport>,
    {
        let key = (year, month);

        if !force {
            let entries = self.entries.read().await;
            if let Some(cached) = entries.get(&key)
                && cached.computed_at.elapsed() < self.ttl
            {
                trace!("report cache hit for {month:02}-{year}");
                return Ok(Arc::clone(&cached.report));
            }
        }

        let report = Arc::new(compute()?);

        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedReport {
                report: Arc::clone(&report),
                computed_at: Instant::now(),
            },
        );
        info!("report cache refreshed for {month:02}-{year}");

        Ok(report)
    }

    /// Drops the cached report for one (year, month), forcing the next
    /// request to recompute.
    pub async fn invalidate(&self, year: i32, month: u32) {
        let mut entries = self.entries.write().await;
        if entries.remove(&(year, month)).is_some() {
            info!("report cache invalidated for {month:02}-{year}");
        }
    }

    /// Drops every cached report.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        info!("report cache cleared, {dropped} entries dropped");
    }
}
