//! `validate` command implementation.

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use contracts::CrawlerSettings;

use crate::cli::ValidateArgs;
use crate::error::Result;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SettingsSummary>,
}

#[derive(Serialize)]
struct SettingsSummary {
    influx_addr: String,
    database: String,
    create_database: bool,
    http_timeout_secs: u64,
    unit_timeout_secs: u64,
    gather_policy: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating settings");

    let result = validate_settings(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Settings validation failed").into())
    }
}

fn validate_settings(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(settings) => {
            let warnings = collect_warnings(&settings);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(SettingsSummary {
                    influx_addr: settings.influx.addr.clone(),
                    database: settings.influx.database.clone(),
                    create_database: settings.influx.create_database,
                    http_timeout_secs: settings.http.timeout_secs,
                    unit_timeout_secs: settings.dispatch.unit_timeout_secs,
                    gather_policy: format!("{:?}", settings.dispatch.gather_policy),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(settings: &CrawlerSettings) -> Vec<String> {
    let mut warnings = Vec::new();

    if settings.credentials.bitcoin_de_api_key.is_none() {
        warnings.push("No bitcoin.de API key - the bitcoinde provider will fail".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Settings are valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  InfluxDB: {} (database {})", summary.influx_addr, summary.database);
            println!("  Create database: {}", summary.create_database);
            println!("  HTTP timeout: {}s", summary.http_timeout_secs);
            println!("  Unit timeout: {}s", summary.unit_timeout_secs);
            println!("  Gather policy: {}", summary.gather_policy);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Settings are invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
