//! LogSink - logs batch summaries via tracing

use std::collections::BTreeSet;

use contracts::{Batch, ContractError, MetricSink};
use tracing::{debug, info, instrument};

use super::line_protocol;
use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// Sink that only logs what would have been written (dry run)
#[derive(Debug, Default)]
pub struct LogSink {
    name: String,
    metrics: SinkMetrics,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: SinkMetrics::new(),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn log_batch_summary(&self, batch: &Batch) {
        let sources: BTreeSet<&str> = batch.iter().map(|p| p.source()).collect();
        let measurements: BTreeSet<&str> =
            batch.iter().map(|p| p.measurement().as_str()).collect();

        info!(
            sink = %self.name,
            points = batch.len(),
            sources = ?sources,
            measurements = ?measurements,
            "Batch received"
        );
        for point in batch {
            let mut line = String::new();
            line_protocol::encode_point(point, &mut line);
            debug!(sink = %self.name, %line, "point");
        }
    }
}

impl MetricSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, batch),
        fields(sink = %self.name, points = batch.len())
    )]
    async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
        self.log_batch_summary(batch);
        self.metrics.record_write(batch.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{source_tags, Measurement, MetricPoint};

    #[tokio::test]
    async fn test_log_sink_write() {
        let sink = LogSink::new("dry_run");
        let point = MetricPoint::builder(Measurement::Network)
            .tags(source_tags("blockchain.info"))
            .field("difficulty", 1.0)
            .build()
            .unwrap();

        sink.write(&Batch::from(vec![point])).await.unwrap();
        assert_eq!(sink.metrics().write_count, 1);
        assert_eq!(sink.metrics().points_written, 1);
    }

    #[test]
    fn test_log_sink_name() {
        assert_eq!(LogSink::new("my_logger").name(), "my_logger");
    }
}
