//! Crawl metrics
//!
//! Thin wrappers over the `metrics` facade so label names stay consistent.
//! Without an installed recorder every call is a no-op.
//!
//! Fetch metrics are labelled by origin host (`source`), crawl metrics by
//! registry name (`crawler`).

use metrics::{counter, gauge, histogram};

/// Record one HTTP fetch (`status` = ok / network_error / decode_error)
pub fn record_fetch(source: &str, status: &'static str) {
    counter!(
        "seismograph_fetches_total",
        "source" => source.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record how a crawler run ended
pub fn record_crawl_outcome(crawler: &str, outcome: &'static str) {
    counter!(
        "seismograph_crawls_total",
        "crawler" => crawler.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record points accepted by the sink
pub fn record_points_written(crawler: &str, points: usize) {
    counter!(
        "seismograph_points_written_total",
        "crawler" => crawler.to_string()
    )
    .increment(points as u64);
}

/// Record wall time of one crawler run
pub fn record_crawl_duration_ms(crawler: &str, duration_ms: f64) {
    histogram!(
        "seismograph_crawl_duration_ms",
        "crawler" => crawler.to_string()
    )
    .record(duration_ms);
}

/// Crawlers currently running
pub fn record_crawls_in_flight(count: usize) {
    gauge!("seismograph_crawls_in_flight").set(count as f64);
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [120.0, 80.0, 100.0, 140.0, 60.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 100.0).abs() < 1e-10);
        assert!((stats.min() - 60.0).abs() < 1e-10);
        assert!((stats.max() - 140.0).abs() < 1e-10);
        assert!((stats.variance() - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_summary_displays_na() {
        assert_eq!(RunningStats::default().summary().to_string(), "N/A");
    }

    #[test]
    fn test_crawl_metrics_are_labelled_by_crawler() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_fetch("blockchain.info", "ok");
            record_crawl_outcome("blockchaininfo_15m", "written");
            record_points_written("blockchaininfo_15m", 3);
        });

        let rendered = handle.render();
        let line = |name: &str| {
            rendered
                .lines()
                .find(|l| l.starts_with(name))
                .unwrap_or_default()
                .to_string()
        };
        assert!(line("seismograph_fetches_total").contains(r#"source="blockchain.info""#));
        assert!(line("seismograph_crawls_total").contains(r#"crawler="blockchaininfo_15m""#));
        assert!(line("seismograph_points_written_total").ends_with(" 3"));
        assert!(!rendered.contains(r#"source="blockchaininfo_15m""#));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_fetch("kraken.com", "ok");
        record_crawl_outcome("kraken", "written");
        record_points_written("kraken", 2);
        record_crawl_duration_ms("kraken", 12.5);
        record_crawls_in_flight(0);
    }
}
