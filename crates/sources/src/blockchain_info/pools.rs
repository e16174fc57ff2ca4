//! Mining-pool hashrate distribution (`api.blockchain.info/pools`)

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::warn;

use contracts::{pool_tags, Batch, ContractError, Measurement, MetricPoint};

pub const POOLS_URL: &str = "https://api.blockchain.info/pools";

/// Known-block counts per pool turned into shares of the total
#[derive(Debug, Clone, PartialEq)]
pub struct HashrateDistribution {
    pub miners: Vec<Miner>,
    pub total_known_blocks: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Miner {
    pub name: String,
    /// Blocks attributed to this pool
    pub known_blocks: f64,
    /// `known_blocks / total_known_blocks`, in `[0, 1]`
    pub block_share: f64,
}

impl HashrateDistribution {
    /// Compute shares from raw `{pool: blocks}` counts
    ///
    /// # Errors
    /// `DivisionByZero` when the counts sum to zero (including an empty map).
    pub fn from_counts(counts: BTreeMap<String, f64>) -> Result<Self, ContractError> {
        let total_known_blocks: f64 = counts.values().sum();
        if total_known_blocks == 0.0 {
            return Err(ContractError::division_by_zero("mining pool block share"));
        }

        let miners = counts
            .into_iter()
            .map(|(name, known_blocks)| Miner {
                name,
                known_blocks,
                block_share: known_blocks / total_known_blocks,
            })
            .collect();

        Ok(Self {
            miners,
            total_known_blocks,
        })
    }

    /// One `pools` point per miner
    ///
    /// A pool whose name cannot form a valid point is dropped with a warning;
    /// the error is returned only when no pool survives.
    pub fn to_points(&self, source: &str, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        let mut batch = Batch::new();
        let mut first_error = None;
        for miner in &self.miners {
            let point = MetricPoint::builder(Measurement::Pools)
                .tags(pool_tags(&miner.name, source))
                .field("share", miner.known_blocks)
                .field("percentage_share", miner.block_share)
                .timestamp(at)
                .build();
            match point {
                Ok(point) => batch.push(point),
                Err(e) => {
                    warn!(source, mining_pool = ?miner.name, error = %e, "dropping pool point");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) if batch.is_empty() => Err(e),
            _ => Ok(batch),
        }
    }
}
