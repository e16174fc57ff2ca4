//! MetricPoint - the normalized record every source produces
//!
//! A point is only obtainable through [`MetricPointBuilder::build`], so a
//! half-filled point is never observable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ContractError;

/// Tag key carrying the origin host name
pub const SOURCE_TAG: &str = "source";
/// Tag key carrying the quote currency
pub const CURRENCY_TAG: &str = "currency";
/// Tag key carrying the mining pool name
pub const MINING_POOL_TAG: &str = "mining_pool";

/// Measurement (series family) a point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Price,
    Network,
    Markets,
    Pools,
}

impl Measurement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Network => "network",
            Self::Markets => "markets",
            Self::Pools => "pools",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote currencies reported by the sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    CNY,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::CNY => "CNY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point tags, sorted by key
pub type Tags = BTreeMap<String, String>;

/// Tags for a point that only identifies its origin
pub fn source_tags(src: &str) -> Tags {
    Tags::from([(SOURCE_TAG.to_string(), src.to_string())])
}

/// Tags for a currency-denominated point
pub fn currency_tags(currency: Currency, src: &str) -> Tags {
    let mut tags = source_tags(src);
    tags.insert(CURRENCY_TAG.to_string(), currency.to_string());
    tags
}

/// Tags for a per-mining-pool point
pub fn pool_tags(mining_pool: &str, src: &str) -> Tags {
    let mut tags = source_tags(src);
    tags.insert(MINING_POOL_TAG.to_string(), mining_pool.to_string());
    tags
}

/// Field value: numeric or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Normalized (measurement, tags, fields, timestamp) record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    measurement: Measurement,
    tags: Tags,
    fields: BTreeMap<String, FieldValue>,
    timestamp: DateTime<Utc>,
}

impl MetricPoint {
    /// Start building a point for `measurement`
    pub fn builder(measurement: Measurement) -> MetricPointBuilder {
        MetricPointBuilder {
            measurement,
            tags: Tags::new(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Origin host name (always present)
    pub fn source(&self) -> &str {
        self.tag(SOURCE_TAG).unwrap_or_default()
    }
}

/// Accumulates tags and fields, validating everything in `build`
#[derive(Debug, Clone)]
pub struct MetricPointBuilder {
    measurement: Measurement,
    tags: Tags,
    fields: BTreeMap<String, FieldValue>,
    timestamp: Option<DateTime<Utc>>,
}

impl MetricPointBuilder {
    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Remote-supplied time; when never called the point is stamped at build time
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Validate and freeze the point
    ///
    /// # Errors
    /// `InvalidPoint` when there are no fields, no `source` tag, an empty tag
    /// key or value, an empty field key, or a non-finite float field.
    pub fn build(self) -> Result<MetricPoint, ContractError> {
        let measurement = self.measurement.as_str();

        if self.fields.is_empty() {
            return Err(ContractError::invalid_point(measurement, "no fields"));
        }
        match self.tags.get(SOURCE_TAG) {
            Some(src) if !src.is_empty() => {}
            _ => return Err(ContractError::invalid_point(measurement, "missing source tag")),
        }
        if let Some((key, _)) = self
            .tags
            .iter()
            .find(|(k, v)| k.is_empty() || v.is_empty())
        {
            return Err(ContractError::invalid_point(
                measurement,
                format!("empty tag '{key}'"),
            ));
        }
        // A line break would split the point across store lines
        if let Some((key, value)) = self
            .tags
            .iter()
            .find(|(k, v)| has_line_break(k) || has_line_break(v))
        {
            return Err(ContractError::invalid_point(
                measurement,
                format!("line break in tag {key:?}={value:?}"),
            ));
        }
        for (key, value) in &self.fields {
            if key.is_empty() {
                return Err(ContractError::invalid_point(measurement, "empty field key"));
            }
            if has_line_break(key) {
                return Err(ContractError::invalid_point(
                    measurement,
                    format!("line break in field key {key:?}"),
                ));
            }
            if let FieldValue::Text(text) = value {
                if has_line_break(text) {
                    return Err(ContractError::invalid_point(
                        measurement,
                        format!("line break in field '{key}'"),
                    ));
                }
            }
            if let FieldValue::Float(v) = value {
                if !v.is_finite() {
                    return Err(ContractError::invalid_point(
                        measurement,
                        format!("field '{key}' is not finite ({v})"),
                    ));
                }
            }
        }

        Ok(MetricPoint {
            measurement: self.measurement,
            tags: self.tags,
            fields: self.fields,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

/// Ordered group of points destined for one sink write
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Batch {
    points: Vec<MetricPoint>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: MetricPoint) {
        self.points.push(point);
    }

    pub fn extend(&mut self, other: Batch) {
        self.points.extend(other.points);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricPoint> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<MetricPoint> {
        self.points
    }
}

impl From<Vec<MetricPoint>> for Batch {
    fn from(points: Vec<MetricPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<MetricPoint> for Batch {
    fn from_iter<I: IntoIterator<Item = MetricPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Batch {
    type Item = MetricPoint;
    type IntoIter = std::vec::IntoIter<MetricPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a MetricPoint;
    type IntoIter = std::slice::Iter<'a, MetricPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
