//! bitcoinchain.com network status

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{source_tags, Batch, ContractError, Measurement, MetricPoint, PointSource, UnixSeconds};

use super::common::flex_f64;

define_point_source!(
    /// Chain height, reward and difficulty
    Bitcoinchain,
    "bitcoinchain.com",
    { status_url => "https://api-r.bitcoinchain.com/v1/status" }
);

#[derive(Debug, Deserialize)]
struct NetworkStatus {
    height: i64,
    hash: String,
    #[serde(deserialize_with = "flex_f64")]
    difficulty: f64,
    #[serde(deserialize_with = "flex_f64")]
    reward: f64,
    time: UnixSeconds,
}

#[async_trait]
impl PointSource for Bitcoinchain {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "bitcoinchain_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let status: NetworkStatus = self.http.get_json(Self::SOURCE, &self.status_url).await?;
        let point = MetricPoint::builder(Measurement::Network)
            .tags(source_tags(Self::SOURCE))
            .field("height", status.height)
            .field("blockReward", status.reward)
            .field("difficulty", status.difficulty)
            .field("lastHash", status.hash)
            .timestamp(status.time.into_inner())
            .build()?;
        Ok(Batch::from(vec![point]))
    }
}
