//! # Config Loader
//!
//! Loads crawler settings.
//!
//! Responsibilities:
//! - Parse TOML/JSON settings files
//! - Apply environment overrides for credentials
//! - Validate settings
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let settings = ConfigLoader::load_from_path(Path::new("seismograph.toml")).unwrap();
//! println!("database: {}", settings.influx.database);
//! ```

mod parser;
mod validator;

pub use contracts::CrawlerSettings;
pub use parser::ConfigFormat;

use contracts::{ContractError, BITCOIN_DE_API_KEY_ENV};
use std::path::Path;
use tracing::{debug, info};

/// Settings loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a file path
    ///
    /// Format is detected from the extension (.toml / .json). Environment
    /// overrides are applied before validation.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<CrawlerSettings, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        info!(path = %path.display(), ?format, "loading settings");
        Self::load_from_str(&content, format)
    }

    /// Load settings from `path`, or defaults when no file is given or it does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<CrawlerSettings, ContractError> {
        match path {
            Some(path) if path.exists() => Self::load_from_path(path),
            Some(path) => {
                info!(path = %path.display(), "settings file not found, using defaults");
                Self::finish(CrawlerSettings::default())
            }
            None => Self::finish(CrawlerSettings::default()),
        }
    }

    /// Load settings from a string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CrawlerSettings, ContractError> {
        let settings = parser::parse(content, format)?;
        Self::finish(settings)
    }

    /// Validate without touching the environment
    pub fn validate(settings: &CrawlerSettings) -> Result<(), ContractError> {
        validator::validate(settings)
    }

    pub fn to_toml(settings: &CrawlerSettings) -> Result<String, ContractError> {
        toml::to_string_pretty(settings)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    pub fn to_json(settings: &CrawlerSettings) -> Result<String, ContractError> {
        serde_json::to_string_pretty(settings)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Overlay environment variables onto `settings`
    ///
    /// `BITCOIN_DE_API_KEY` replaces the configured key when set and non-empty.
    pub fn apply_env_overrides(settings: &mut CrawlerSettings) {
        Self::apply_overrides_from(settings, |key| std::env::var(key).ok());
    }
}

impl ConfigLoader {
    fn apply_overrides_from<F>(settings: &mut CrawlerSettings, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(BITCOIN_DE_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            debug!(var = BITCOIN_DE_API_KEY_ENV, "credential taken from environment");
            settings.credentials.bitcoin_de_api_key = Some(key);
        }
    }

    fn finish(mut settings: CrawlerSettings) -> Result<CrawlerSettings, ContractError> {
        Self::apply_env_overrides(&mut settings);
        validator::validate(&settings)?;
        Ok(settings)
    }

    /// Infer settings format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
