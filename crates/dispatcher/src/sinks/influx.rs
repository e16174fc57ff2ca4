//! InfluxSink - InfluxDB 1.x HTTP writer

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use contracts::{Batch, ContractError, HttpSettings, InfluxSettings, MetricSink};

use super::line_protocol;
use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// Body of a `/query` response; statement failures still come back as HTTP 200
#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatementResult {
    #[serde(default)]
    error: Option<String>,
}

impl QueryResponse {
    fn first_error(self) -> Option<String> {
        self.error
            .into_iter()
            .chain(self.results.into_iter().filter_map(|r| r.error))
            .next()
    }
}

/// Writes batches as line protocol to `POST {addr}/write`
#[derive(Debug)]
pub struct InfluxSink {
    name: String,
    client: Client,
    addr: String,
    database: String,
    metrics: SinkMetrics,
}

impl InfluxSink {
    pub fn new(influx: &InfluxSettings, http: &HttpSettings) -> Result<Self, ContractError> {
        let client = Client::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(|e| ContractError::config_validation("influx", e.to_string()))?;
        Ok(Self::with_client(client, influx))
    }

    pub fn with_client(client: Client, influx: &InfluxSettings) -> Self {
        Self {
            name: "influxdb".to_string(),
            client,
            addr: influx.addr.trim_end_matches('/').to_string(),
            database: influx.database.clone(),
            metrics: SinkMetrics::new(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Create the target database if it does not exist (idempotent on the server)
    #[instrument(name = "influx_sink_ensure_database", skip(self), fields(database = %self.database))]
    pub async fn ensure_database(&self) -> Result<(), ContractError> {
        let statement = format!("CREATE DATABASE \"{}\"", self.database);
        let response = self
            .client
            .post(format!("{}/query", self.addr))
            .query(&[("q", statement.as_str())])
            .send()
            .await
            .map_err(|e| self.error(format!("create database request failed: {e}")))?;
        let response = self.check(response, "create database").await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.error(format!("create database response unreadable: {e}")))?;
        let parsed: QueryResponse = serde_json::from_slice(&body)
            .map_err(|e| self.error(format!("create database response undecodable: {e}")))?;
        if let Some(error) = parsed.first_error() {
            return Err(self.error(format!("create database failed: {error}")));
        }

        info!(sink = %self.name, database = %self.database, "database ready");
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> ContractError {
        ContractError::sink_write(&self.name, message)
    }

    async fn check(&self, response: Response, operation: &str) -> Result<Response, ContractError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(self.error(format!("{operation} returned HTTP {status}: {}", body.trim())))
    }

    async fn post_lines(&self, body: String) -> Result<(), ContractError> {
        let response = self
            .client
            .post(format!("{}/write", self.addr))
            .query(&[("db", self.database.as_str()), ("precision", "s")])
            .body(body)
            .send()
            .await
            .map_err(|e| self.error(format!("write request failed: {e}")))?;
        self.check(response, "write").await.map(drop)
    }
}

impl MetricSink for InfluxSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "influx_sink_write",
        skip(self, batch),
        fields(sink = %self.name, points = batch.len())
    )]
    async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
        if batch.is_empty() {
            return Ok(());
        }

        match self.post_lines(line_protocol::encode(batch)).await {
            Ok(()) => {
                self.metrics.record_write(batch.len());
                debug!(sink = %self.name, points = batch.len(), "batch written");
                Ok(())
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                Err(e)
            }
        }
    }
}
