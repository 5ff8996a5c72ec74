//! Ingestion counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Datagrams read from the source, whatever their content
    pub datagrams_received: AtomicU64,

    /// Payloads that were not UTF-8 JSON
    pub decode_failures: AtomicU64,

    /// Payloads that decoded but failed validation
    pub schema_failures: AtomicU64,

    /// Beacons written to the table
    pub beacons_accepted: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_schema_failure(&self) {
        self.schema_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accepted(&self) {
        self.beacons_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            schema_failures: self.schema_failures.load(Ordering::Relaxed),
            beacons_accepted: self.beacons_accepted.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub datagrams_received: u64,
    pub decode_failures: u64,
    pub schema_failures: u64,
    pub beacons_accepted: u64,
}

impl MetricsSnapshot {
    /// Datagrams dropped for any reason
    pub fn rejected(&self) -> u64 {
        self.decode_failures + self.schema_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = IngestionMetrics::new();
        for _ in 0..3 {
            metrics.record_received();
        }
        metrics.record_decode_failure();
        metrics.record_schema_failure();
        metrics.record_accepted();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.datagrams_received, 3);
        assert_eq!(snapshot.rejected(), 2);
        assert_eq!(snapshot.beacons_accepted, 1);
    }
}
