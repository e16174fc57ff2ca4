//! bitcoinaverage.com global price index

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{Batch, ContractError, Currency, PointSource, UnixSeconds};

use super::common::price_point;

define_point_source!(
    /// Global BTC price index in USD and EUR
    BitcoinAverage,
    "bitcoinaverage.com",
    {
        usd_url => "https://apiv2.bitcoinaverage.com/indices/global/ticker/BTCUSD",
        eur_url => "https://apiv2.bitcoinaverage.com/indices/global/ticker/BTCEUR",
    }
);

#[derive(Debug, Deserialize)]
struct AverageTicker {
    ask: f64,
    bid: f64,
    last: f64,
    high: f64,
    low: f64,
    timestamp: UnixSeconds,
}

impl AverageTicker {
    fn to_point(&self, currency: Currency) -> Result<contracts::MetricPoint, ContractError> {
        price_point(
            BitcoinAverage::SOURCE,
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
impl PointSource for BitcoinAverage {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "bitcoin_average_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let (usd, eur) = futures::try_join!(
            self.http.get_json::<AverageTicker>(Self::SOURCE, &self.usd_url),
            self.http.get_json::<AverageTicker>(Self::SOURCE, &self.eur_url),
        )?;
        Ok(Batch::from(vec![
            usd.to_point(Currency::USD)?,
            eur.to_point(Currency::EUR)?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::{fetcher, mount_json};
    use contracts::{FieldValue, CURRENCY_TAG};
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_collect_uses_remote_timestamp() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/indices/global/ticker/BTCUSD",
            r#"{"ask":2510.0,"bid":2500.0,"last":2505.0,"high":2600.0,"low":2400.0,"timestamp":1500000000}"#,
        )
        .await;
        mount_json(
            &server,
            "/indices/global/ticker/BTCEUR",
            r#"{"ask":2210.0,"bid":2200.0,"last":2205.0,"high":2300.0,"low":2100.0,"timestamp":"1500000060"}"#,
        )
        .await;

        let batch = BitcoinAverage::new(fetcher())
            .with_base_url(&server.uri())
            .collect()
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        let usd = &batch.points()[0];
        assert_eq!(usd.tag(CURRENCY_TAG), Some("USD"));
        assert_eq!(usd.field("high"), Some(&FieldValue::Float(2600.0)));
        assert_eq!(usd.timestamp().timestamp(), 1_500_000_000);
        assert_eq!(batch.points()[1].timestamp().timestamp(), 1_500_000_060);
    }
}
