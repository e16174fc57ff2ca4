//! Exchange-rate ticker (`blockchain.info/ticker`)

use chrono::{DateTime, Utc};
use serde::Deserialize;

use contracts::{currency_tags, Batch, ContractError, Currency, Measurement, MetricPoint};

pub const TICKER_URL: &str = "https://blockchain.info/ticker";

/// BTC prices in the currencies the crawler records
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    #[serde(rename = "USD")]
    pub usd: Price,
    #[serde(rename = "EUR")]
    pub eur: Price,
    #[serde(rename = "CNY")]
    pub cny: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub last: f64,
    /// Price delayed by 15 minutes
    #[serde(rename = "15m", default)]
    pub delayed: f64,
    #[serde(default)]
    pub symbol: String,
    pub buy: f64,
    pub sell: f64,
}

impl Ticker {
    pub fn price(&self, currency: Currency) -> &Price {
        match currency {
            Currency::USD => &self.usd,
            Currency::EUR => &self.eur,
            Currency::CNY => &self.cny,
        }
    }

    /// One `price` point per currency; `buy` is reported as `ask`, `sell` as `bid`
    pub fn to_points(&self, source: &str, at: DateTime<Utc>) -> Result<Batch, ContractError> {
        [Currency::USD, Currency::EUR, Currency::CNY]
            .into_iter()
            .map(|currency| {
                let price = self.price(currency);
                MetricPoint::builder(Measurement::Price)
                    .tags(currency_tags(currency, source))
                    .field("ask", price.buy)
                    .field("bid", price.sell)
                    .field("last", price.last)
                    .timestamp(at)
                    .build()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FieldValue, CURRENCY_TAG};

    const BODY: &str = r#"{
        "USD": {"15m": 2500.1, "last": 2500.5, "buy": 2501.0, "sell": 2499.0, "symbol": "$"},
        "EUR": {"15m": 2200.1, "last": 2200.5, "buy": 2201.0, "sell": 2199.0, "symbol": "€"},
        "CNY": {"15m": 17000.0, "last": 17001.0, "buy": 17002.0, "sell": 17000.5, "symbol": "¥"},
        "GBP": {"15m": 1900.0, "last": 1900.0, "buy": 1900.0, "sell": 1900.0, "symbol": "£"}
    }"#;

    #[test]
    fn test_ticker_maps_buy_to_ask_and_sell_to_bid() {
        let ticker: Ticker = serde_json::from_str(BODY).unwrap();
        let at = Utc::now();
        let batch = ticker.to_points("blockchain.info", at).unwrap();

        assert_eq!(batch.len(), 3);
        let eur = batch
            .iter()
            .find(|p| p.tag(CURRENCY_TAG) == Some("EUR"))
            .unwrap();
        assert_eq!(eur.field("ask"), Some(&FieldValue::Float(2201.0)));
        assert_eq!(eur.field("bid"), Some(&FieldValue::Float(2199.0)));
        assert_eq!(eur.field("last"), Some(&FieldValue::Float(2200.5)));
        assert!(batch.iter().all(|p| p.timestamp() == at));
    }
}
