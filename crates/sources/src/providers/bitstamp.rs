//! bitstamp.net tickers

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{Batch, ContractError, Currency, MetricPoint, PointSource, UnixSeconds};

use super::common::{flex_f64, price_point};

define_point_source!(
    /// BTC/USD and BTC/EUR tickers
    Bitstamp,
    "bitstamp.net",
    {
        usd_url => "https://www.bitstamp.net/api/v2/ticker/btcusd/",
        eur_url => "https://www.bitstamp.net/api/v2/ticker/btceur/",
    }
);

// Every number arrives as a string
#[derive(Debug, Deserialize)]
struct PriceTicker {
    #[serde(deserialize_with = "flex_f64")]
    high: f64,
    #[serde(deserialize_with = "flex_f64")]
    low: f64,
    #[serde(deserialize_with = "flex_f64")]
    last: f64,
    #[serde(deserialize_with = "flex_f64")]
    bid: f64,
    #[serde(deserialize_with = "flex_f64")]
    ask: f64,
    timestamp: UnixSeconds,
}

impl PriceTicker {
    fn to_point(&self, currency: Currency) -> Result<MetricPoint, ContractError> {
        price_point(
            Bitstamp::SOURCE,
            currency,
            Some(self.timestamp.into_inner()),
            &[
                ("last", self.last),
                ("bid", self.bid),
                ("ask", self.ask),
                ("high", self.high),
                ("low", self.low),
            ],
        )
    }
}

#[async_trait]
impl PointSource for Bitstamp {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "bitstamp_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let (usd, eur) = futures::try_join!(
            self.http.get_json::<PriceTicker>(Self::SOURCE, &self.usd_url),
            self.http.get_json::<PriceTicker>(Self::SOURCE, &self.eur_url),
        )?;
        Ok(Batch::from(vec![
            usd.to_point(Currency::USD)?,
            eur.to_point(Currency::EUR)?,
        ]))
    }
}
