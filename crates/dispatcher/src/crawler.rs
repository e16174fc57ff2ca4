//! Crawler - one runnable unit of the dispatch framework
//!
//! Either a single-endpoint source or an aggregator bound to one cadence.
//! Running a crawler never returns an error: failures are logged, counted
//! and reported through [`CrawlOutcome`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, instrument};

use contracts::{Batch, ContractError, CrawlCadence, FrequencyAggregator, MetricSink, PointSource};

/// How one crawler run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Batch accepted by the sink
    Written { points: usize },
    /// Source produced no points; nothing written
    Empty,
    /// Fetch, decode or point construction failed; nothing written
    GatherFailed,
    /// Sink rejected the batch
    WriteFailed,
    /// Unit deadline elapsed
    TimedOut,
    /// Task panicked
    Panicked,
}

impl CrawlOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Written { .. } => "written",
            Self::Empty => "empty",
            Self::GatherFailed => "gather_failed",
            Self::WriteFailed => "write_failed",
            Self::TimedOut => "timed_out",
            Self::Panicked => "panicked",
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Written { .. } | Self::Empty)
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runnable unit: a point source or an aggregator at a fixed cadence
#[derive(Clone)]
pub enum Crawler {
    Single(Arc<dyn PointSource>),
    Aggregated {
        aggregator: Arc<dyn FrequencyAggregator>,
        cadence: CrawlCadence,
    },
}

impl Crawler {
    pub fn single(source: impl PointSource + 'static) -> Self {
        Self::Single(Arc::new(source))
    }

    /// Bind a shared aggregator to one cadence
    pub fn aggregated(aggregator: Arc<dyn FrequencyAggregator>, cadence: CrawlCadence) -> Self {
        Self::Aggregated {
            aggregator,
            cadence,
        }
    }

    /// Origin host of the underlying source
    pub fn source(&self) -> &str {
        match self {
            Self::Single(source) => source.source(),
            Self::Aggregated { aggregator, .. } => aggregator.source(),
        }
    }

    pub fn cadence(&self) -> Option<CrawlCadence> {
        match self {
            Self::Single(_) => None,
            Self::Aggregated { cadence, .. } => Some(*cadence),
        }
    }

    async fn produce(&self) -> Result<Batch, ContractError> {
        match self {
            Self::Single(source) => source.collect().await,
            Self::Aggregated {
                aggregator,
                cadence,
            } => aggregator.gather(*cadence).await,
        }
    }

    /// Produce one batch and hand it to `sink`
    ///
    /// At most one write per run; errors are logged once and swallowed.
    #[instrument(
        name = "crawler_run",
        skip(self, sink),
        fields(source = self.source(), cadence = ?self.cadence())
    )]
    pub async fn run<S>(&self, name: &str, sink: &S) -> CrawlOutcome
    where
        S: MetricSink + Sync,
    {
        let outcome = match self.produce().await {
            Err(e) => {
                error!(
                    crawler = name,
                    source = self.source(),
                    cadence = ?self.cadence(),
                    operation = "gather",
                    kind = e.kind(),
                    error = %e,
                    "crawl failed, nothing written"
                );
                CrawlOutcome::GatherFailed
            }
            Ok(batch) if batch.is_empty() => {
                debug!(crawler = name, "empty batch, skipping write");
                CrawlOutcome::Empty
            }
            Ok(batch) => match sink.write(&batch).await {
                Ok(()) => {
                    let points = batch.len();
                    observability::record_points_written(name, points);
                    debug!(crawler = name, points, sink = sink.name(), "batch written");
                    CrawlOutcome::Written { points }
                }
                Err(e) => {
                    error!(
                        crawler = name,
                        source = self.source(),
                        operation = "write",
                        sink = sink.name(),
                        error = %e,
                        "sink write failed, batch dropped"
                    );
                    CrawlOutcome::WriteFailed
                }
            },
        };

        observability::record_crawl_outcome(name, outcome.as_str());
        outcome
    }
}

impl fmt::Debug for Crawler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(source) => f.debug_tuple("Single").field(&source.source()).finish(),
            Self::Aggregated {
                aggregator,
                cadence,
            } => f
                .debug_struct("Aggregated")
                .field("source", &aggregator.source())
                .field("cadence", cadence)
                .finish(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use contracts::{source_tags, Measurement, MetricPoint};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    pub fn point(source: &str) -> MetricPoint {
        MetricPoint::builder(Measurement::Network)
            .tags(source_tags(source))
            .field("height", 1_i64)
            .build()
            .unwrap()
    }

    /// Source with a scripted behavior
    pub enum Script {
        Points(usize),
        Fail,
        Sleep(Duration),
        Panic,
    }

    pub struct ScriptedSource {
        pub name: &'static str,
        pub script: Script,
    }

    #[async_trait]
    impl PointSource for ScriptedSource {
        fn source(&self) -> &str {
            self.name
        }

        async fn collect(&self) -> Result<Batch, ContractError> {
            match &self.script {
                Script::Points(n) => Ok((0..*n).map(|_| point(self.name)).collect()),
                Script::Fail => Err(ContractError::network(self.name, "http://x", "HTTP 500")),
                Script::Sleep(d) => {
                    tokio::time::sleep(*d).await;
                    Ok(Batch::from(vec![point(self.name)]))
                }
                Script::Panic => panic!("source exploded"),
            }
        }
    }

    pub struct CadenceEcho;

    #[async_trait]
    impl FrequencyAggregator for CadenceEcho {
        fn source(&self) -> &str {
            "echo"
        }

        async fn gather(&self, cadence: CrawlCadence) -> Result<Batch, ContractError> {
            let n = match cadence {
                CrawlCadence::Immediate => 4,
                CrawlCadence::QuarterHour => 3,
                CrawlCadence::Hour | CrawlCadence::Day => 1,
            };
            Ok((0..n).map(|_| point("echo")).collect())
        }
    }

    /// Sink that remembers every batch
    #[derive(Default)]
    pub struct MockSink {
        pub fail: bool,
        pub batches: Mutex<Vec<Batch>>,
        pub calls: AtomicUsize,
    }

    impl MockSink {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn points(&self) -> usize {
            self.batches.lock().unwrap().iter().map(Batch::len).sum()
        }
    }

    impl MetricSink for MockSink {
        fn name(&self) -> &str {
            "mock"
        }

        async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ContractError::sink_write("mock", "store unavailable"));
            }
            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }
    }
}
