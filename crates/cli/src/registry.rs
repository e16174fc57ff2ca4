//! Default provider registry

use std::sync::Arc;

use contracts::{CrawlCadence, CrawlerSettings, FrequencyAggregator};
use dispatcher::{Crawler, CrawlerRegistry};
use sources::{
    BitcoinAverage, BitcoinDe, Bitcoinchain, Bitfinex, Bitstamp, BlockExplorer, BlockchainInfo,
    Blockr, CoinDesk, CoinMarketCap, HttpFetcher, Kraken,
};

use crate::error::{CliError, Result};

/// Name prefix of the four blockchain.info cadence crawlers
const BLOCKCHAIN_INFO_PREFIX: &str = "blockchaininfo";

/// Build the registry of every known provider
///
/// The four `blockchaininfo_*` entries share one aggregator and differ only
/// in the cadence they request.
pub fn build_registry(settings: &CrawlerSettings) -> Result<CrawlerRegistry> {
    let http = HttpFetcher::new(&settings.http).map_err(CliError::Settings)?;

    let blockchain_info: Arc<dyn FrequencyAggregator> = Arc::new(
        BlockchainInfo::new(http.clone()).with_policy(settings.dispatch.gather_policy),
    );

    let mut builder = CrawlerRegistry::builder();
    for cadence in CrawlCadence::ALL {
        builder = builder.register(
            format!("{BLOCKCHAIN_INFO_PREFIX}_{}", cadence.suffix()),
            Crawler::aggregated(Arc::clone(&blockchain_info), cadence),
        );
    }

    let api_key = settings.credentials.bitcoin_de_api_key.clone();
    let registry = builder
        .register("bitcoinAverage", Crawler::single(BitcoinAverage::new(http.clone())))
        .register("bitcoinchain", Crawler::single(Bitcoinchain::new(http.clone())))
        .register("bitcoinde", Crawler::single(BitcoinDe::new(http.clone(), api_key)))
        .register("bitcoinexplorer", Crawler::single(BlockExplorer::new(http.clone())))
        .register("bitfinex", Crawler::single(Bitfinex::new(http.clone())))
        .register("bitstamp", Crawler::single(Bitstamp::new(http.clone())))
        .register("blockrio", Crawler::single(Blockr::new(http.clone())))
        .register("coindesk", Crawler::single(CoinDesk::new(http.clone())))
        .register("coinmarketcap", Crawler::single(CoinMarketCap::new(http.clone())))
        .register("kraken", Crawler::single(Kraken::new(http)))
        .build()?;

    Ok(registry)
}
