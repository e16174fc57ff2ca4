//! blockchain.info - cadence-tiered multi-endpoint aggregator
//!
//! | cadence      | endpoints                                          |
//! |--------------|----------------------------------------------------|
//! | immediate    | ticker, unconfirmed count                          |
//! | quarter-hour | 24h tx count, block interval, difficulty, pools    |
//! | hour         | market cap                                         |
//! | day          | difficulty, median confirmation time chart         |
//!
//! Endpoints are grouped by the point(s) they produce. Groups run
//! concurrently; [`GatherPolicy`] decides what a failing group does to the
//! rest of the batch.

mod charts;
mod pools;
mod query;
mod ticker;

pub use charts::{Chart, Coordinate};
pub use pools::{HashrateDistribution, Miner};
pub use query::Query;
pub use ticker::{Price, Ticker};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{join_all, try_join_all, BoxFuture, FutureExt};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use contracts::{
    currency_tags, source_tags, Batch, ContractError, CrawlCadence, Currency,
    FrequencyAggregator, GatherPolicy, Measurement, MetricPoint,
};

use crate::http::{rebase, HttpFetcher};

/// Origin host, used as the `source` tag
pub const SOURCE: &str = "blockchain.info";

type PointGroup<'a> = BoxFuture<'a, Result<Batch, ContractError>>;

/// Every URL the aggregator talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockchainInfoEndpoints {
    pub ticker: String,
    pub transaction_count: String,
    pub unconfirmed_count: String,
    pub block_interval: String,
    pub difficulty: String,
    pub market_cap: String,
    pub median_confirmation_time: String,
    pub pools: String,
}

impl Default for BlockchainInfoEndpoints {
    fn default() -> Self {
        Self {
            ticker: ticker::TICKER_URL.to_string(),
            transaction_count: Query::TransactionCount.default_url(),
            unconfirmed_count: Query::UnconfirmedCount.default_url(),
            block_interval: Query::BlockInterval.default_url(),
            difficulty: Query::Difficulty.default_url(),
            market_cap: Query::MarketCap.default_url(),
            median_confirmation_time: charts::MEDIAN_CONFIRMATION_TIME_URL.to_string(),
            pools: pools::POOLS_URL.to_string(),
        }
    }
}

impl BlockchainInfoEndpoints {
    /// Default endpoints with scheme and host replaced by `base`
    ///
    /// Both `blockchain.info` and `api.blockchain.info` collapse onto the
    /// same base; their paths do not overlap.
    pub fn with_base_url(base: &str) -> Self {
        let d = Self::default();
        Self {
            ticker: rebase(&d.ticker, base),
            transaction_count: rebase(&d.transaction_count, base),
            unconfirmed_count: rebase(&d.unconfirmed_count, base),
            block_interval: rebase(&d.block_interval, base),
            difficulty: rebase(&d.difficulty, base),
            market_cap: rebase(&d.market_cap, base),
            median_confirmation_time: rebase(&d.median_confirmation_time, base),
            pools: rebase(&d.pools, base),
        }
    }
}

/// blockchain.info aggregator
#[derive(Debug, Clone)]
pub struct BlockchainInfo {
    http: HttpFetcher,
    endpoints: BlockchainInfoEndpoints,
    policy: GatherPolicy,
}

impl BlockchainInfo {
    pub fn new(http: HttpFetcher) -> Self {
        Self {
            http,
            endpoints: BlockchainInfoEndpoints::default(),
            policy: GatherPolicy::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: BlockchainInfoEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_base_url(self, base: &str) -> Self {
        self.with_endpoints(BlockchainInfoEndpoints::with_base_url(base))
    }

    pub fn with_policy(mut self, policy: GatherPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> GatherPolicy {
        self.policy
    }

    fn point_groups(&self, cadence: CrawlCadence, at: DateTime<Utc>) -> Vec<PointGroup<'_>> {
        match cadence {
            CrawlCadence::Immediate => vec![
                self.exchange_rates(at).boxed(),
                self.unconfirmed_count(at).boxed(),
            ],
            CrawlCadence::QuarterHour => vec![
                self.network_activity(at).boxed(),
                self.mining_pools(at).boxed(),
            ],
            CrawlCadence::Hour => vec![self.market_cap(at).boxed()],
            CrawlCadence::Day => vec![self.daily_network(at).boxed()],
        }
    }

    async fn number(&self, url: &str) -> Result<f64, ContractError> {
        self.http.get_number(SOURCE, url).await
    }

    async fn exchange_rates(&self, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let ticker: Ticker = self.http.get_json(SOURCE, &self.endpoints.ticker).await?;
        ticker.to_points(SOURCE, at)
    }

    async fn unconfirmed_count(&self, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let count = self.number(&self.endpoints.unconfirmed_count).await?;
        single(
            MetricPoint::builder(Measurement::Network)
                .tags(source_tags(SOURCE))
                .field("unconfirmedCount", count)
                .timestamp(at)
                .build()?,
        )
    }

    async fn network_activity(&self, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let (transaction_count, block_interval, difficulty) = futures::try_join!(
            self.number(&self.endpoints.transaction_count),
            self.number(&self.endpoints.block_interval),
            self.number(&self.endpoints.difficulty),
        )?;
        single(
            MetricPoint::builder(Measurement::Network)
                .tags(source_tags(SOURCE))
                .field("transactionCount", transaction_count)
                .field("blockInterval", block_interval)
                .field("difficulty", difficulty)
                .timestamp(at)
                .build()?,
        )
    }

    async fn mining_pools(&self, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let counts: BTreeMap<String, f64> =
            self.http.get_json(SOURCE, &self.endpoints.pools).await?;
        HashrateDistribution::from_counts(counts)?.to_points(SOURCE, at)
    }

    async fn market_cap(&self, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let market_cap = self.number(&self.endpoints.market_cap).await?;
        single(
            MetricPoint::builder(Measurement::Markets)
                .tags(currency_tags(Currency::USD, SOURCE))
                .field("marketCap", market_cap)
                .timestamp(at)
                .build()?,
        )
    }

    async fn daily_network(&self, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let url = &self.endpoints.median_confirmation_time;
        let (difficulty, chart) = futures::try_join!(
            self.number(&self.endpoints.difficulty),
            self.http.get_json::<Chart>(SOURCE, url),
        )?;
        let median_confirmation_time = chart
            .last_value()
            .ok_or_else(|| ContractError::decode(SOURCE, url.as_str(), "chart has no values"))?;
        single(
            MetricPoint::builder(Measurement::Network)
                .tags(source_tags(SOURCE))
                .field("difficulty", difficulty)
                .field("medianConfirmationTime", median_confirmation_time)
                .timestamp(at)
                .build()?,
        )
    }
}

fn single(point: MetricPoint) -> Result<Batch, ContractError> {
    Ok(Batch::from(vec![point]))
}

#[async_trait]
impl FrequencyAggregator for BlockchainInfo {
    fn source(&self) -> &str {
        SOURCE
    }

    #[instrument(name = "blockchain_info_gather", skip(self))]
    async fn gather(&self, cadence: CrawlCadence) -> Result<Batch, ContractError> {
        // One fetch time shared by every point of this gather
        let at = Utc::now();
        let groups = self.point_groups(cadence, at);

        let mut batch = Batch::new();
        match self.policy {
            GatherPolicy::Strict => {
                for group in try_join_all(groups).await? {
                    batch.extend(group);
                }
            }
            GatherPolicy::Lenient => {
                let mut first_error = None;
                for result in join_all(groups).await {
                    match result {
                        Ok(group) => batch.extend(group),
                        Err(e) => {
                            warn!(source = SOURCE, %cadence, error = %e, "point group failed, keeping the rest");
                            first_error.get_or_insert(e);
                        }
                    }
                }
                if batch.is_empty() {
                    if let Some(e) = first_error {
                        return Err(e);
                    }
                }
            }
        }

        debug!(source = SOURCE, %cadence, points = batch.len(), "gather complete");
        Ok(batch)
    }
}
