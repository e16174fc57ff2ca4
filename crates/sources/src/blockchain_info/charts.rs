//! Chart endpoints (`api.blockchain.info/charts/...`)

use serde::Deserialize;

/// Median confirmation time over the last week
pub const MEDIAN_CONFIRMATION_TIME_URL: &str =
    "https://api.blockchain.info/charts/Median-Confirmation-Time?timespan=1week";

/// Time series returned by a chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub values: Vec<Coordinate>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub unit: String,
}

/// One chart sample: `x` is Unix seconds, `y` depends on the chart
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: f64,
}

impl Chart {
    /// Most recent sample value, `None` for an empty chart
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().map(|c| c.y)
    }
}
