//! blockr.io coin info

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{source_tags, Batch, ContractError, Measurement, MetricPoint, PointSource};

use super::common::flex_f64;

define_point_source!(
    /// Last block and next difficulty retarget
    Blockr,
    "blockr.io",
    { info_url => "http://btc.blockr.io/api/v1/coin/info" }
);

#[derive(Debug, Deserialize)]
struct CoinInfo {
    data: CoinData,
}

#[derive(Debug, Deserialize)]
struct CoinData {
    last_block: LastBlock,
    next_difficulty: NextDifficulty,
}

#[derive(Debug, Deserialize)]
struct LastBlock {
    nb: i64,
    #[serde(deserialize_with = "flex_f64")]
    difficulty: f64,
}

#[derive(Debug, Deserialize)]
struct NextDifficulty {
    retarget_in: i64,
    retarget_block: i64,
}

#[async_trait]
impl PointSource for Blockr {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "blockr_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let CoinInfo { data } = self.http.get_json(Self::SOURCE, &self.info_url).await?;
        let point = MetricPoint::builder(Measurement::Network)
            .tags(source_tags(Self::SOURCE))
            .field("height", data.last_block.nb)
            .field("difficulty", data.last_block.difficulty)
            .field("retarget_in", data.next_difficulty.retarget_in)
            .field("retarget_block", data.next_difficulty.retarget_block)
            .build()?;
        Ok(Batch::from(vec![point]))
    }
}
