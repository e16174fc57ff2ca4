//! Decoding and point helpers shared by the single-endpoint sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use contracts::{currency_tags, ContractError, Currency, Measurement, MetricPoint};

/// Number that some APIs send as a JSON number and others as a string
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexF64(pub f64);

impl<'de> Deserialize<'de> for FlexF64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self(v)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}"))),
        }
    }
}

/// `deserialize_with` adapter for [`FlexF64`] fields
pub fn flex_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    FlexF64::deserialize(deserializer).map(|v| v.0)
}

/// Element `index` of a positional array, or a `Decode` error naming `what`
pub fn nth(
    values: &[FlexF64],
    index: usize,
    source: &str,
    url: &str,
    what: &str,
) -> Result<f64, ContractError> {
    values.get(index).map(|v| v.0).ok_or_else(|| {
        ContractError::decode(
            source,
            url,
            format!("{what}: expected at least {} values, got {}", index + 1, values.len()),
        )
    })
}

/// `price` point for one currency; `at = None` stamps it at build time
pub fn price_point(
    source: &str,
    currency: Currency,
    at: Option<DateTime<Utc>>,
    fields: &[(&str, f64)],
) -> Result<MetricPoint, ContractError> {
    let mut builder = MetricPoint::builder(Measurement::Price).tags(currency_tags(currency, source));
    for (key, value) in fields {
        builder = builder.field(*key, *value);
    }
    if let Some(at) = at {
        builder = builder.timestamp(at);
    }
    builder.build()
}
