//! Layered error definitions
//!
//! Categorized by origin: fetch / point construction / sink / config

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Fetch Errors =====
    /// Endpoint unreachable, timed out or answered with a non-success status
    #[error("network error from '{source_name}' ({url}): {message}")]
    Network {
        source_name: String,
        url: String,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("decode error from '{source_name}' ({url}): {message}")]
    Decode {
        source_name: String,
        url: String,
        message: String,
    },

    /// A credentialed source was run without its credential
    #[error("missing credential '{credential}' for source '{source_name}'")]
    MissingCredential {
        source_name: String,
        credential: String,
    },

    /// Cadence text did not name a known tier
    #[error("invalid cadence: '{0}'")]
    InvalidCadence(String),

    // ===== Point Errors =====
    /// A metric point could not be fully constructed
    #[error("invalid '{measurement}' point: {message}")]
    InvalidPoint {
        measurement: String,
        message: String,
    },

    /// Share computation over an empty total
    #[error("division by zero while computing {context}")]
    DivisionByZero { context: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create network error
    pub fn network(
        source_name: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Network {
            source_name: source_name.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create decode error
    pub fn decode(
        source_name: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create missing credential error
    pub fn missing_credential(
        source_name: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self::MissingCredential {
            source_name: source_name.into(),
            credential: credential.into(),
        }
    }

    /// Create invalid point error
    pub fn invalid_point(measurement: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPoint {
            measurement: measurement.into(),
            message: message.into(),
        }
    }

    /// Create division by zero error
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short machine-friendly label, used as a log/metric dimension
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Decode { .. } => "decode",
            Self::MissingCredential { .. } => "missing_credential",
            Self::InvalidCadence(_) => "invalid_cadence",
            Self::InvalidPoint { .. } => "invalid_point",
            Self::DivisionByZero { .. } => "division_by_zero",
            Self::SinkWrite { .. } => "sink_write",
            Self::ConfigParse { .. } => "config_parse",
            Self::ConfigValidation { .. } => "config_validation",
            Self::Io(_) => "io",
        }
    }
}
