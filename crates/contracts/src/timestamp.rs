//! UnixSeconds - quoted decimal Unix-seconds timestamp codec
//!
//! Several APIs embed time as `"1500000000"`. Decoding accepts the quoted
//! form and a bare integer; encoding always writes the quoted form.
//! Sub-second precision is dropped on encode.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Absolute time decoded from Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixSeconds(pub DateTime<Utc>);

impl UnixSeconds {
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    pub fn as_secs(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for UnixSeconds {
    fn from(t: DateTime<Utc>) -> Self {
        Self(t)
    }
}

impl Serialize for UnixSeconds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_secs().to_string())
    }
}

struct UnixSecondsVisitor;

impl UnixSecondsVisitor {
    fn from_secs<E: de::Error>(secs: i64) -> Result<UnixSeconds, E> {
        UnixSeconds::from_secs(secs)
            .ok_or_else(|| E::custom(format!("timestamp out of range: {secs}")))
    }
}

impl<'de> Visitor<'de> for UnixSecondsVisitor {
    type Value = UnixSeconds;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unix seconds as a decimal string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let secs: i64 = v
            .trim_matches('"')
            .trim()
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))?;
        Self::from_secs(secs)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Self::from_secs(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let secs = i64::try_from(v)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))?;
        Self::from_secs(secs)
    }
}

impl<'de> Deserialize<'de> for UnixSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(UnixSecondsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Serialize)]
    struct Ticker {
        timestamp: UnixSeconds,
    }

    #[test]
    fn test_decode_quoted_seconds() {
        let t: Ticker = serde_json::from_str(r#"{"timestamp":"1500000000"}"#).unwrap();
        assert_eq!(t.timestamp.as_secs(), 1_500_000_000);
    }

    #[test]
    fn test_decode_bare_integer() {
        let t: Ticker = serde_json::from_str(r#"{"timestamp":1500000000}"#).unwrap();
        assert_eq!(t.timestamp.as_secs(), 1_500_000_000);
    }

    #[test]
    fn test_encode_is_quoted() {
        let t = Ticker {
            timestamp: UnixSeconds::from_secs(1_500_000_000).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&t).unwrap(),
            r#"{"timestamp":"1500000000"}"#
        );
    }

    #[test]
    fn test_round_trip_truncates_to_whole_seconds() {
        let precise = Utc.timestamp_opt(1_500_000_000, 987_654_321).unwrap();
        let json = serde_json::to_string(&UnixSeconds(precise)).unwrap();
        let back: UnixSeconds = serde_json::from_str(&json).unwrap();

        assert_eq!(back.as_secs(), precise.timestamp());
        assert_eq!(back.0, Utc.timestamp_opt(1_500_000_000, 0).unwrap());
        assert_ne!(back.0, precise);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let res: Result<Ticker, _> = serde_json::from_str(r#"{"timestamp":"yesterday"}"#);
        assert!(res.is_err());
    }
}
