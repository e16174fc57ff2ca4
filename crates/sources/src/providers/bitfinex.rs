//! bitfinex.com positional ticker

use async_trait::async_trait;
use tracing::instrument;

use contracts::{Batch, ContractError, Currency, PointSource};

use super::common::{nth, price_point, FlexF64};

define_point_source!(
    /// BTC/USD ticker
    Bitfinex,
    "bitfinex.com",
    { ticker_url => "https://api.bitfinex.com/v2/ticker/tBTCUSD" }
);

// [BID, BID_SIZE, ASK, ASK_SIZE, DAILY_CHANGE, DAILY_CHANGE_PERC, LAST_PRICE, VOLUME, HIGH, LOW]
const BID: usize = 0;
const ASK: usize = 2;
const LAST: usize = 6;
const HIGH: usize = 8;
const LOW: usize = 9;

#[async_trait]
impl PointSource for Bitfinex {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "bitfinex_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let url = &self.ticker_url;
        let ticker: Vec<FlexF64> = self.http.get_json(Self::SOURCE, url).await?;
        let at = |i| nth(&ticker, i, Self::SOURCE, url, "ticker");

        let point = price_point(
            Self::SOURCE,
            Currency::USD,
            None,
            &[
                ("last", at(LAST)?),
                ("bid", at(BID)?),
                ("ask", at(ASK)?),
                ("high", at(HIGH)?),
                ("low", at(LOW)?),
            ],
        )?;
        Ok(Batch::from(vec![point]))
    }
}
