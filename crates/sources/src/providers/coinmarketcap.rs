//! coinmarketcap.com bitcoin ticker

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use contracts::{
    currency_tags, Batch, ContractError, Currency, Measurement, MetricPoint, PointSource,
    UnixSeconds,
};

use super::common::{flex_f64, price_point};

define_point_source!(
    /// USD price plus market capitalization
    CoinMarketCap,
    "coinmarketcap.com",
    { ticker_url => "https://api.coinmarketcap.com/v1/ticker/bitcoin/" }
);

#[derive(Debug, Deserialize)]
struct MarketCap {
    #[serde(deserialize_with = "flex_f64")]
    price_usd: f64,
    #[serde(rename = "24h_volume_usd", deserialize_with = "flex_f64")]
    volume_usd_24h: f64,
    #[serde(deserialize_with = "flex_f64")]
    market_cap_usd: f64,
    #[serde(deserialize_with = "flex_f64")]
    available_supply: f64,
    last_updated: UnixSeconds,
}

#[async_trait]
impl PointSource for CoinMarketCap {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "coinmarketcap_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let tickers: Vec<MarketCap> = self.http.get_json(Self::SOURCE, &self.ticker_url).await?;
        let btc = tickers.first().ok_or_else(|| {
            ContractError::decode(Self::SOURCE, self.ticker_url.as_str(), "empty ticker list")
        })?;
        let at = btc.last_updated.into_inner();

        let price = price_point(Self::SOURCE, Currency::USD, Some(at), &[("last", btc.price_usd)])?;
        let markets = MetricPoint::builder(Measurement::Markets)
            .tags(currency_tags(Currency::USD, Self::SOURCE))
            .field("marketCap", btc.market_cap_usd)
            .field("volume", btc.volume_usd_24h)
            .field("availableCoins", btc.available_supply)
            .timestamp(at)
            .build()?;
        Ok(Batch::from(vec![price, markets]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::{fetcher, mount_json};
    use contracts::FieldValue;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_collect_price_and_markets() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/v1/ticker/bitcoin/",
            r#"[{"id":"bitcoin","name":"Bitcoin","symbol":"BTC","rank":"1",
                 "price_usd":"2350.5","price_btc":"1.0","24h_volume_usd":"1200000000.0",
                 "market_cap_usd":"38600000000.0","available_supply":"16440000.0",
                 "total_supply":"16440000.0","last_updated":"1500000000"}]"#,
        )
        .await;

        let batch = CoinMarketCap::new(fetcher())
            .with_base_url(&server.uri())
            .collect()
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        let markets = &batch.points()[1];
        assert_eq!(markets.measurement(), Measurement::Markets);
        assert_eq!(markets.field("volume"), Some(&FieldValue::Float(1_200_000_000.0)));
        assert_eq!(markets.timestamp().timestamp(), 1_500_000_000);
    }

    #[tokio::test]
    async fn test_empty_list_is_decode_error() {
        let server = MockServer::start().await;
        mount_json(&server, "/v1/ticker/bitcoin/", "[]").await;

        let err = CoinMarketCap::new(fetcher())
            .with_base_url(&server.uri())
            .collect()
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Decode { .. }));
    }
}
