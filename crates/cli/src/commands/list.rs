//! `list` command implementation.

use anyhow::Context;
use serde::Serialize;

use contracts::CrawlerSettings;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::registry::build_registry;

#[derive(Serialize)]
struct ProviderInfo {
    name: String,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cadence: Option<String>,
}

/// Execute the `list` command
pub fn run_list(args: &ListArgs) -> Result<()> {
    let registry = build_registry(&CrawlerSettings::default())?;
    let providers: Vec<ProviderInfo> = registry
        .iter()
        .map(|(name, crawler)| ProviderInfo {
            name: name.to_string(),
            source: crawler.source().to_string(),
            cadence: crawler.cadence().map(|c| c.to_string()),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&providers)
            .context("Failed to serialize provider list")?;
        println!("{json}");
        return Ok(());
    }

    for provider in &providers {
        match &provider.cadence {
            Some(cadence) => println!("{:<20} {} ({cadence})", provider.name, provider.source),
            None => println!("{:<20} {}", provider.name, provider.source),
        }
    }
    Ok(())
}
