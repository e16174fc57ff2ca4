//! Source traits - the boundary between fetching raw data and emitting points
//!
//! Both traits are object safe so a registry can hold heterogeneous sources.

use async_trait::async_trait;

use crate::{Batch, ContractError, CrawlCadence};

/// Single fetch-and-map source
///
/// Performs its endpoint fetch(es) and maps the typed result into points.
/// Any fetch or mapping failure aborts the whole collection.
#[async_trait]
pub trait PointSource: Send + Sync {
    /// Origin host name, also used as the `source` tag
    fn source(&self) -> &str;

    /// Fetch and normalize once
    async fn collect(&self) -> Result<Batch, ContractError>;
}

/// Multi-endpoint source whose endpoint subset depends on the cadence
#[async_trait]
pub trait FrequencyAggregator: Send + Sync {
    /// Origin host name, also used as the `source` tag
    fn source(&self) -> &str;

    /// Query the endpoints belonging to `cadence` and merge their points
    ///
    /// Returns a non-empty batch, or an error and no batch.
    async fn gather(&self, cadence: CrawlCadence) -> Result<Batch, ContractError>;
}
