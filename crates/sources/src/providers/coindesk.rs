//! coindesk.com bitcoin price index

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use contracts::{Batch, ContractError, Currency, PointSource};

use super::common::price_point;

define_point_source!(
    /// BPI in USD and EUR
    CoinDesk,
    "coindesk.com",
    { current_price_url => "http://api.coindesk.com/v1/bpi/currentprice.json" }
);

#[derive(Debug, Deserialize)]
struct PriceIndex {
    time: UpdateTime,
    bpi: Bpi,
}

#[derive(Debug, Deserialize)]
struct UpdateTime {
    #[serde(rename = "updatedISO")]
    updated_iso: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Bpi {
    #[serde(rename = "USD")]
    usd: IndexRate,
    #[serde(rename = "EUR")]
    eur: IndexRate,
}

#[derive(Debug, Deserialize)]
struct IndexRate {
    rate_float: f64,
}

#[async_trait]
impl PointSource for CoinDesk {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "coindesk_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let index: PriceIndex = self
            .http
            .get_json(Self::SOURCE, &self.current_price_url)
            .await?;
        let at = Some(index.time.updated_iso);
        Ok(Batch::from(vec![
            price_point(Self::SOURCE, Currency::USD, at, &[("last", index.bpi.usd.rate_float)])?,
            price_point(Self::SOURCE, Currency::EUR, at, &[("last", index.bpi.eur.rate_float)])?,
        ]))
    }
}
