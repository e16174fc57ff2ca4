//! Error types for CLI operations.

use contracts::ContractError;
use dispatcher::DispatchError;
use thiserror::Error;

/// Exit code used when no provider was selected
pub const NO_PROVIDER_EXIT_CODE: u8 = 101;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Settings could not be loaded or failed validation
    #[error("settings error: {0}")]
    Settings(#[source] ContractError),

    /// InfluxDB could not be prepared
    #[error("failed to prepare sink: {0}")]
    Sink(#[source] ContractError),

    /// Registry construction or run selection failed
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Dispatch(DispatchError::NoSourcesSelected) => NO_PROVIDER_EXIT_CODE,
            _ => 1,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_provider_exit_code() {
        assert_eq!(CliError::from(DispatchError::NoSourcesSelected).exit_code(), 101);
        assert_eq!(
            CliError::Settings(ContractError::config_parse("bad")).exit_code(),
            1
        );
    }
}
