//! Pruning statistics
//!
//! Cumulative call counts and latencies, shared by every pruning call a
//! service makes. Safe to record from concurrent requests.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Totals across every recorded call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneTotals {
    pub hits: u64,
    pub total_time: Duration,
    pub peak_time: Duration,
    pub peak_path: String,
    pub last_time: Duration,
    pub last_path: String,
}

impl fmt::Display for PruneTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LastTime: {:?} LastPath: {} Hits: {} TotalTime: {:?} PeakTime: {:?} PeakPath: {}",
            self.last_time, self.last_path, self.hits, self.total_time, self.peak_time, self.peak_path
        )
    }
}

/// Aggregates for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathStats {
    pub hits: u64,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl PathStats {
    fn first(elapsed: Duration) -> Self {
        Self {
            hits: 1,
            total: elapsed,
            min: elapsed,
            max: elapsed,
        }
    }

    fn add(&mut self, elapsed: Duration) {
        self.hits += 1;
        self.total += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
    }

    pub fn mean(&self) -> Duration {
        if self.hits == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.hits);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub taken_at: String,
    pub totals: PruneTotals,
    pub paths: HashMap<String, PathStats>,
}

#[derive(Debug, Default)]
struct Inner {
    totals: PruneTotals,
    paths: HashMap<String, PathStats>,
}

/// Shared statistics accumulator
#[derive(Debug, Default)]
pub struct PruneStats {
    inner: Mutex<Inner>,
}

impl PruneStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pruning call
    ///
    /// `uri` is the requested path as sent, list predicates included, and only
    /// feeds the last/peak markers. Per-path aggregates are keyed by `xpath`,
    /// the predicate-free schema path, so list instances share one entry.
    pub fn record(&self, xpath: &str, uri: &str, elapsed: Duration) {
        let mut inner = self.inner.lock();

        let totals = &mut inner.totals;
        totals.hits += 1;
        totals.total_time += elapsed;
        totals.last_time = elapsed;
        totals.last_path = uri.to_string();
        if elapsed > totals.peak_time {
            totals.peak_time = elapsed;
            totals.peak_path = uri.to_string();
        }

        match inner.paths.get_mut(xpath) {
            Some(stats) => stats.add(elapsed),
            None => {
                inner.paths.insert(xpath.to_string(), PathStats::first(elapsed));
            }
        }
    }

    pub fn totals(&self) -> PruneTotals {
        self.inner.lock().totals.clone()
    }

    pub fn path(&self, path: &str) -> Option<PathStats> {
        self.inner.lock().paths.get(path).copied()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        StatsSnapshot {
            taken_at: chrono::Utc::now().to_rfc3339(),
            totals: inner.totals.clone(),
            paths: inner.paths.clone(),
        }
    }

    pub fn clear(&self) {
        *self.inner.lock() = Inner::default();
    }
}
