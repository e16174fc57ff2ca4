//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single sink, shared by every crawler writing to it
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Batches accepted by the store
    write_count: AtomicU64,
    /// Batches rejected or not delivered
    failure_count: AtomicU64,
    /// Points contained in accepted batches
    points_written: AtomicU64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Count one accepted batch of `points` points
    pub fn record_write(&self, points: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.points_written
            .fetch_add(points as u64, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn points_written(&self) -> u64 {
        self.points_written.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_count: self.write_count(),
            failure_count: self.failure_count(),
            points_written: self.points_written(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub write_count: u64,
    pub failure_count: u64,
    pub points_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let metrics = SinkMetrics::new();
        metrics.record_write(3);
        metrics.record_write(2);
        metrics.inc_failure_count();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                write_count: 2,
                failure_count: 1,
                points_written: 5,
            }
        );
    }
}
