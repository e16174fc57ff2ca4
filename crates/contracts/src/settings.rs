//! CrawlerSettings - Config Loader output
//!
//! Describes where points are written, how sources are fetched and how a
//! dispatch run behaves. Every section has defaults so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use validator::Validate;

/// Environment variable holding the bitcoin.de API key
pub const BITCOIN_DE_API_KEY_ENV: &str = "BITCOIN_DE_API_KEY";

/// Complete crawler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CrawlerSettings {
    /// Time-series store
    #[serde(default)]
    #[validate(nested)]
    pub influx: InfluxSettings,

    /// Outbound HTTP
    #[serde(default)]
    #[validate(nested)]
    pub http: HttpSettings,

    /// Dispatch behavior
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// Pre-obtained credentials, passed through unchanged
    #[serde(default)]
    pub credentials: Credentials,
}

/// InfluxDB connection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InfluxSettings {
    /// Base address, e.g. `http://localhost:8086`
    #[serde(default = "default_influx_addr")]
    #[validate(url)]
    pub addr: String,

    /// Database all points are written to
    #[serde(default = "default_database")]
    #[validate(length(min = 1, max = 64))]
    pub database: String,

    /// Issue `CREATE DATABASE` before crawling
    #[serde(default = "default_true")]
    pub create_database: bool,
}

impl Default for InfluxSettings {
    fn default() -> Self {
        Self {
            addr: default_influx_addr(),
            database: default_database(),
            create_database: true,
        }
    }
}

fn default_influx_addr() -> String {
    "http://localhost:8086".to_string()
}

fn default_database() -> String {
    "seismograph".to_string()
}

fn default_true() -> bool {
    true
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("seismograph-crawler/", env!("CARGO_PKG_VERSION")).to_string()
}

/// How an aggregator treats a failing endpoint within one gather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatherPolicy {
    /// Any failing endpoint discards the whole batch
    #[default]
    Strict,
    /// Keep points whose endpoints succeeded; fail only if all failed
    Lenient,
}

/// Dispatch run settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Per-crawler deadline in seconds (0 = run to natural completion)
    #[serde(default)]
    pub unit_timeout_secs: u64,

    /// Fail the run on unknown crawler names instead of skipping them
    #[serde(default)]
    pub reject_unknown: bool,

    #[serde(default)]
    pub gather_policy: GatherPolicy,
}

impl DispatchSettings {
    pub fn unit_timeout(&self) -> Option<Duration> {
        (self.unit_timeout_secs > 0).then(|| Duration::from_secs(self.unit_timeout_secs))
    }
}

/// Source credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// bitcoin.de API key
    #[serde(default)]
    pub bitcoin_de_api_key: Option<String>,
}

// Keys never reach the logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "bitcoin_de_api_key",
                &self.bitcoin_de_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = CrawlerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.influx.database, "seismograph");
        assert_eq!(settings.dispatch.unit_timeout(), None);
        assert_eq!(settings.dispatch.gather_policy, GatherPolicy::Strict);
    }

    #[test]
    fn test_zero_http_timeout_is_invalid() {
        let mut settings = CrawlerSettings::default();
        settings.http.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials {
            bitcoin_de_api_key: Some("s3cret".to_string()),
        };
        let printed = format!("{creds:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("redacted"));
    }
}
