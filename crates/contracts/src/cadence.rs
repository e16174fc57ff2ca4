//! CrawlCadence - polling tier selector
//!
//! A cadence carries no state; it only selects which subset of a
//! source's endpoints an aggregator queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Requested polling tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlCadence {
    /// Soft real-time, polled every minute
    Immediate,
    /// Every fifteen minutes
    QuarterHour,
    /// Every hour
    Hour,
    /// Once per day
    Day,
}

impl CrawlCadence {
    /// All tiers, fastest first
    pub const ALL: [CrawlCadence; 4] = [
        CrawlCadence::Immediate,
        CrawlCadence::QuarterHour,
        CrawlCadence::Hour,
        CrawlCadence::Day,
    ];

    /// Short suffix used in crawler names (`blockchaininfo_15m`)
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Immediate => "1m",
            Self::QuarterHour => "15m",
            Self::Hour => "1h",
            Self::Day => "1d",
        }
    }
}

impl fmt::Display for CrawlCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Immediate => "immediate",
            Self::QuarterHour => "quarter-hour",
            Self::Hour => "hour",
            Self::Day => "day",
        };
        f.write_str(name)
    }
}

impl FromStr for CrawlCadence {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "immediate" => Ok(Self::Immediate),
            "15m" | "quarter-hour" => Ok(Self::QuarterHour),
            "1h" | "hour" => Ok(Self::Hour),
            "1d" | "day" => Ok(Self::Day),
            _ => Err(ContractError::InvalidCadence(s.to_string())),
        }
    }
}
