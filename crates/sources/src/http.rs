//! HTTP fetch helper shared by every source

use bytes::Bytes;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use contracts::{ContractError, HttpSettings};

/// Thin wrapper around a shared `reqwest::Client`
///
/// Maps transport failures and non-success statuses to `Network`, and body
/// decoding failures to `Decode`, always naming the source and URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client from settings
    pub fn new(settings: &HttpSettings) -> Result<Self, ContractError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ContractError::config_validation("http", e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and decode the JSON body into `T`
    #[instrument(name = "http_get_json", skip(self), level = "debug")]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        source: &str,
        url: &str,
    ) -> Result<T, ContractError> {
        let body = self.get_body(source, url).await?;
        let decoded = serde_json::from_slice(&body).map_err(|e| {
            observability::record_fetch(source, "decode_error");
            ContractError::decode(source, url, e.to_string())
        })?;
        observability::record_fetch(source, "ok");
        Ok(decoded)
    }

    /// GET `url` whose body is a single plain-text number
    #[instrument(name = "http_get_number", skip(self), level = "debug")]
    pub async fn get_number(&self, source: &str, url: &str) -> Result<f64, ContractError> {
        let body = self.get_body(source, url).await?;
        let text = String::from_utf8_lossy(&body);
        let value = text.trim().parse::<f64>().map_err(|_| {
            observability::record_fetch(source, "decode_error");
            ContractError::decode(source, url, format!("not a number: {:?}", text.trim()))
        })?;
        observability::record_fetch(source, "ok");
        Ok(value)
    }

    async fn get_body(&self, source: &str, url: &str) -> Result<Bytes, ContractError> {
        let response = self.send(source, url).await?;
        response.bytes().await.map_err(|e| {
            observability::record_fetch(source, "network_error");
            ContractError::network(source, url, format!("reading body failed: {e}"))
        })
    }

    async fn send(&self, source: &str, url: &str) -> Result<Response, ContractError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            observability::record_fetch(source, "network_error");
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("request failed: {e}")
            };
            ContractError::network(source, url, message)
        })?;

        let status = response.status();
        debug!(source, url, status = status.as_u16(), "response received");
        if !status.is_success() {
            observability::record_fetch(source, "network_error");
            return Err(ContractError::network(source, url, format!("HTTP {status}")));
        }
        Ok(response)
    }
}


/// Replace scheme and host of `url` with `base`, keeping path and query
///
/// Lets a whole source be pointed at a mirror or a local test server.
pub fn rebase(url: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(path_start) => format!("{base}{}", &url[after_scheme + path_start..]),
        None => base.to_string(),
    }
}
