//! kraken.com public ticker

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{Batch, ContractError, Currency, MetricPoint, PointSource};

use super::common::{nth, price_point, FlexF64};

define_point_source!(
    /// BTC/USD and BTC/EUR from one ticker call
    Kraken,
    "kraken.com",
    { ticker_url => "https://api.kraken.com/0/public/Ticker?pair=BTCEUR,XBTUSD" }
);

#[derive(Debug, Deserialize)]
struct TickerResponse {
    result: TickerResult,
}

#[derive(Debug, Deserialize)]
struct TickerResult {
    #[serde(rename = "XXBTZUSD")]
    usd: PairTicker,
    #[serde(rename = "XXBTZEUR")]
    eur: PairTicker,
}

/// Arrays of decimal strings: `[today, last 24 hours]` or `[price, lot volume, ...]`
#[derive(Debug, Deserialize)]
struct PairTicker {
    a: Vec<FlexF64>,
    b: Vec<FlexF64>,
    c: Vec<FlexF64>,
    h: Vec<FlexF64>,
    l: Vec<FlexF64>,
}

impl PairTicker {
    fn to_point(&self, currency: Currency, url: &str) -> Result<MetricPoint, ContractError> {
        let src = Kraken::SOURCE;
        price_point(
            src,
            currency,
            None,
            &[
                ("last", nth(&self.c, 0, src, url, "last trade")?),
                ("bid", nth(&self.b, 0, src, url, "bid")?),
                ("ask", nth(&self.a, 0, src, url, "ask")?),
                ("high", nth(&self.h, 1, src, url, "24h high")?),
                ("low", nth(&self.l, 1, src, url, "24h low")?),
            ],
        )
    }
}

#[async_trait]
impl PointSource for Kraken {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "kraken_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let ticker: TickerResponse = self.http.get_json(Self::SOURCE, &self.ticker_url).await?;
        Ok(Batch::from(vec![
            ticker.result.usd.to_point(Currency::USD, &self.ticker_url)?,
            ticker.result.eur.to_point(Currency::EUR, &self.ticker_url)?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::{fetcher, mount_json};
    use contracts::{FieldValue, CURRENCY_TAG};
    use wiremock::MockServer;

    fn pair(last: &str) -> String {
        format!(
            r#"{{"a":["{last}1","1","1.000"],"b":["{last}0","2","2.000"],"c":["{last}5","0.01"],
                "v":["100","200"],"p":["1","1"],"t":[10,20],
                "l":["1000.0","1100.0"],"h":["3000.0","3100.0"],"o":"2000.0"}}"#
        )
    }

    #[tokio::test]
    async fn test_collect_reads_24h_high_and_low() {
        let server = MockServer::start().await;
        let body = format!(
            r#"{{"error":[],"result":{{"XXBTZUSD":{},"XXBTZEUR":{}}}}}"#,
            pair("250"),
            pair("220")
        );
        mount_json(&server, "/0/public/Ticker", &body).await;

        let batch = Kraken::new(fetcher())
            .with_base_url(&server.uri())
            .collect()
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        let usd = &batch.points()[0];
        assert_eq!(usd.tag(CURRENCY_TAG), Some("USD"));
        assert_eq!(usd.field("last"), Some(&FieldValue::Float(2505.0)));
        assert_eq!(usd.field("bid"), Some(&FieldValue::Float(2500.0)));
        assert_eq!(usd.field("high"), Some(&FieldValue::Float(3100.0)));
        assert_eq!(usd.field("low"), Some(&FieldValue::Float(1100.0)));
        assert_eq!(batch.points()[1].field("ask"), Some(&FieldValue::Float(2201.0)));
    }
}
