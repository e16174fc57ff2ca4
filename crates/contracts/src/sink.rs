//! MetricSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for the time-series store.

use crate::{Batch, ContractError};

/// Time-series store
///
/// One sink instance is shared by every concurrently running crawler, so
/// writes take `&self`; any internal synchronization is the sink's concern.
#[trait_variant::make(MetricSink: Send)]
pub trait LocalMetricSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one batch with second precision
    ///
    /// # Errors
    /// Returns `SinkWrite` with the sink name and cause
    async fn write(&self, batch: &Batch) -> Result<(), ContractError>;
}
