//! Decoders for the scalar encodings used by the marketplace API.
//!
//! Prices arrive either as plain integers or as display strings such as
//! `"11.3k"`, `"43,657"` or `"- 138.2k"`. Graph keys are epoch milliseconds
//! encoded as strings. Everything here is pure.

use crate::core::error::{ExchangeError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

static ABBREVIATED_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+]?\d+(?:\.\d+)?)([kmbKMB])$").expect("abbreviated price pattern is valid")
});

/// A price as it appears on the wire, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(i64),
    Text(String),
}

impl RawPrice {
    pub fn decode(&self) -> Result<i64> {
        match self {
            RawPrice::Number(value) => Ok(*value),
            RawPrice::Text(text) => decode_price(text),
        }
    }
}

impl From<i64> for RawPrice {
    fn from(value: i64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_string())
    }
}

fn magnitude(suffix: &str) -> Option<f64> {
    match suffix.to_ascii_lowercase().as_str() {
        "k" => Some(1_000.0),
        "m" => Some(1_000_000.0),
        "b" => Some(1_000_000_000.0),
        _ => None,
    }
}

/// Decodes a display-formatted price string into an integer amount.
///
/// Whitespace is removed before anything else so that a sign separated from
/// its magnitude (`"- 138.2k"`) is kept. Abbreviated amounts are truncated
/// towards zero after scaling. Amounts outside the `i64` range are rejected.
pub fn decode_price(raw: &str) -> Result<i64> {
    let malformed = || ExchangeError::MalformedPrice {
        raw: raw.to_string(),
    };
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(caps) = ABBREVIATED_PRICE.captures(&compact) {
        let base: f64 = caps[1].parse().map_err(|_| malformed())?;
        let scale = magnitude(&caps[2]).ok_or_else(malformed)?;
        let scaled = base * scale;
        // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
        if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return Err(malformed());
        }
        return Ok(scaled as i64);
    }

    compact.replace(',', "").parse().map_err(|_| malformed())
}

/// Decodes an epoch-millisecond string into a UTC timestamp with whole-second
/// precision.
pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let malformed = || ExchangeError::MalformedTimestamp {
        raw: raw.to_string(),
    };
    let millis: i64 = raw.trim().parse().map_err(|_| malformed())?;
    DateTime::from_timestamp(millis.div_euclid(1000), 0).ok_or_else(malformed)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

/// Accepts `true`/`false` either as JSON booleans or as strings.
pub fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(value) => Ok(value),
        RawFlag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean flag: {other:?}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_abbreviated_prices() {
        assert_eq!(decode_price("11.3k").unwrap(), 11_300);
        assert_eq!(decode_price("24.4m").unwrap(), 24_400_000);
        assert_eq!(decode_price("1.8b").unwrap(), 1_800_000_000);
        assert_eq!(decode_price("5.9m").unwrap(), 5_900_000);
        assert_eq!(decode_price("2K").unwrap(), 2_000);
    }

    #[test]
    fn test_plain_and_separated_prices() {
        assert_eq!(decode_price("43,657").unwrap(), 43_657);
        assert_eq!(decode_price("1,234,567").unwrap(), 1_234_567);
        assert_eq!(decode_price("987").unwrap(), 987);
    }

    #[test]
    fn test_sign_separated_by_whitespace_is_kept() {
        assert_eq!(decode_price("- 138.2k").unwrap(), -138_200);
        assert_eq!(decode_price("+ 12").unwrap(), 12);
        assert_eq!(decode_price("- 5,000").unwrap(), -5_000);
    }

    #[test]
    fn test_numeric_price_is_unchanged() {
        assert_eq!(RawPrice::from(100).decode().unwrap(), 100);
        assert_eq!(RawPrice::from(-7).decode().unwrap(), -7);
        assert_eq!(RawPrice::from("11.3k").decode().unwrap(), 11_300);
    }

    #[test]
    fn test_unknown_price_formats_fail() {
        for raw in [
            "34.5t",
            "",
            "k",
            "abc",
            "1.2.3k",
            "12 apples",
            "10000000000b",
            "-99999999999b",
            "99999999999999999999",
        ] {
            match decode_price(raw) {
                Err(ExchangeError::MalformedPrice { raw: reported }) => assert_eq!(reported, raw),
                other => panic!("expected MalformedPrice for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_abbreviated_prices_near_range_limits() {
        assert_eq!(decode_price("9000000000b").unwrap(), 9_000_000_000_000_000_000);
        assert_eq!(decode_price("-9000000000b").unwrap(), -9_000_000_000_000_000_000);
        assert!(decode_price("9300000000b").is_err());
        assert!(decode_price("-9300000000b").is_err());
    }

    #[test]
    fn test_timestamp_decoding() {
        assert_eq!(
            decode_timestamp("1595808000000").unwrap(),
            Utc.with_ymd_and_hms(2020, 7, 27, 0, 0, 0).unwrap()
        );
        // Sub-second precision is dropped
        assert_eq!(
            decode_timestamp("1595808000999").unwrap(),
            Utc.with_ymd_and_hms(2020, 7, 27, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bad_timestamp_fails() {
        assert!(matches!(
            decode_timestamp("not_an_epoch"),
            Err(ExchangeError::MalformedTimestamp { raw }) if raw == "not_an_epoch"
        ));
    }

    #[test]
    fn test_decoders_are_idempotent() {
        assert_eq!(
            decode_price("- 138.2k").unwrap(),
            decode_price("- 138.2k").unwrap()
        );
        assert_eq!(
            decode_timestamp("1595721600000").unwrap(),
            decode_timestamp("1595721600000").unwrap()
        );
    }

    #[test]
    fn test_flag_accepts_strings_and_booleans() {
        #[derive(Deserialize)]
        struct Flagged {
            #[serde(deserialize_with = "deserialize_flag")]
            members: bool,
        }

        let parsed: Flagged = serde_json::from_str(r#"{"members": "true"}"#).unwrap();
        assert!(parsed.members);
        let parsed: Flagged = serde_json::from_str(r#"{"members": false}"#).unwrap();
        assert!(!parsed.members);
        assert!(serde_json::from_str::<Flagged>(r#"{"members": "maybe"}"#).is_err());
    }
}
