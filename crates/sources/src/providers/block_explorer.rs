//! blockexplorer.com status queries

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{source_tags, Batch, ContractError, Measurement, MetricPoint, PointSource};

define_point_source!(
    /// Block count, difficulty and last block hash
    BlockExplorer,
    "blockexplorer.com",
    {
        block_count_url => "https://blockexplorer.com/api/status?q=getBlockCount",
        difficulty_url => "https://blockexplorer.com/api/status?q=getDifficulty",
        last_hash_url => "https://blockexplorer.com/api/status?q=getLastBlockHash",
    }
);

#[derive(Debug, Deserialize)]
struct BlockCount {
    blockcount: i64,
}

#[derive(Debug, Deserialize)]
struct Difficulty {
    difficulty: f64,
}

#[derive(Debug, Deserialize)]
struct LastHash {
    lastblockhash: String,
}

#[async_trait]
impl PointSource for BlockExplorer {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "block_explorer_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let (count, difficulty, hash) = futures::try_join!(
            self.http.get_json::<BlockCount>(Self::SOURCE, &self.block_count_url),
            self.http.get_json::<Difficulty>(Self::SOURCE, &self.difficulty_url),
            self.http.get_json::<LastHash>(Self::SOURCE, &self.last_hash_url),
        )?;
        let point = MetricPoint::builder(Measurement::Network)
            .tags(source_tags(Self::SOURCE))
            .field("height", count.blockcount)
            .field("difficulty", difficulty.difficulty)
            .field("lastHash", hash.lastblockhash)
            .build()?;
        Ok(Batch::from(vec![point]))
    }
}
