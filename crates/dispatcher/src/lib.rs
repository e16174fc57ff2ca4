//! # Dispatcher
//!
//! Crawl dispatch.
//!
//! Responsible for:
//! - Binding sources to names (`CrawlerRegistry`)
//! - Running a selected subset concurrently and joining all of them
//! - Handing each produced batch to the shared `MetricSink`

pub mod crawler;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod sinks;

pub use contracts::{Batch, MetricSink};
pub use crawler::{CrawlOutcome, Crawler};
pub use dispatcher::{Dispatcher, DispatcherConfig, RunSummary};
pub use error::DispatchError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use registry::{CrawlerRegistry, CrawlerRegistryBuilder};
pub use sinks::{line_protocol, InfluxSink, LogSink};
