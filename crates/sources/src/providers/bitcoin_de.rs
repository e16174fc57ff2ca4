//! bitcoin.de weighted rate (credentialed)

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use tracing::{instrument, warn};

use contracts::{Batch, ContractError, Currency, PointSource, BITCOIN_DE_API_KEY_ENV};

use super::common::price_point;
use crate::http::{rebase, HttpFetcher};

const RATE_URL_TEMPLATE: &str = "https://bitcoinapi.de/v1/{api_key}/rate.json";

/// Weighted EUR rate; needs an API key which is placed verbatim in the URL path
#[derive(Clone)]
pub struct BitcoinDe {
    http: HttpFetcher,
    url_template: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeightedRate {
    rate_weighted: f64,
}

impl BitcoinDe {
    pub const SOURCE: &'static str = "bitcoin.de";

    pub fn new(http: HttpFetcher, api_key: Option<String>) -> Self {
        Self {
            http,
            url_template: RATE_URL_TEMPLATE.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn with_base_url(mut self, base: &str) -> Self {
        self.url_template = rebase(&self.url_template, base);
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for BitcoinDe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitcoinDe")
            .field("url_template", &self.url_template)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl PointSource for BitcoinDe {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(name = "bitcoin_de_collect", skip(self))]
    async fn collect(&self) -> Result<Batch, ContractError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!(source = Self::SOURCE, "missing API key");
            return Err(ContractError::missing_credential(
                Self::SOURCE,
                BITCOIN_DE_API_KEY_ENV,
            ));
        };

        let url = self.url_template.replace("{api_key}", api_key);
        let rate: WeightedRate = self.http.get_json(Self::SOURCE, &url).await?;
        // No time in the response; stamped at fetch time
        let point = price_point(
            Self::SOURCE,
            Currency::EUR,
            None,
            &[("last", rate.rate_weighted)],
        )?;
        Ok(Batch::from(vec![point]))
    }
}
