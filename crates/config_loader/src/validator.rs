//! Settings validation
//!
//! Rules:
//! - derive rules on the settings types (URL, ranges, lengths)
//! - influx address uses http or https
//! - database name can be quoted in `CREATE DATABASE`
//! - unit timeout no longer than one day

use contracts::{ContractError, CrawlerSettings};
use ::validator::Validate;

const MAX_UNIT_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Validate settings, returning the first error found
pub fn validate(settings: &CrawlerSettings) -> Result<(), ContractError> {
    validate_derived(settings)?;
    validate_influx_scheme(settings)?;
    validate_database_name(settings)?;
    validate_unit_timeout(settings)?;
    Ok(())
}

fn validate_derived(settings: &CrawlerSettings) -> Result<(), ContractError> {
    settings.validate().map_err(|errors| {
        let field = errors
            .errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "settings".to_string());
        ContractError::config_validation(field, errors.to_string())
    })
}

fn validate_influx_scheme(settings: &CrawlerSettings) -> Result<(), ContractError> {
    let addr = &settings.influx.addr;
    if !(addr.starts_with("http://") || addr.starts_with("https://")) {
        return Err(ContractError::config_validation(
            "influx.addr",
            format!("expected an http(s) URL, got '{addr}'"),
        ));
    }
    Ok(())
}

fn validate_database_name(settings: &CrawlerSettings) -> Result<(), ContractError> {
    let database = &settings.influx.database;
    if database.contains('"') || database.contains('\\') || database.trim() != database {
        return Err(ContractError::config_validation(
            "influx.database",
            format!("invalid database name '{database}'"),
        ));
    }
    Ok(())
}

fn validate_unit_timeout(settings: &CrawlerSettings) -> Result<(), ContractError> {
    let secs = settings.dispatch.unit_timeout_secs;
    if secs > MAX_UNIT_TIMEOUT_SECS {
        return Err(ContractError::config_validation(
            "dispatch.unit_timeout_secs",
            format!("must be at most {MAX_UNIT_TIMEOUT_SECS}, got {secs}"),
        ));
    }
    Ok(())
}
