//! Lenient number decoding for recognition JSON.
//!
//! 64-bit integers are emitted as JSON strings by the service, 32-bit ones as
//! numbers, and default values may be omitted or `null`.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Number {
    fn into_i64<E: Error>(self) -> Result<i64, E> {
        match self {
            Number::Int(v) => Ok(v),
            Number::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            Number::Float(v) => Err(E::custom(format!("non-finite offset {v}"))),
            Number::Str(s) => s
                .trim()
                .parse()
                .map_err(|e| E::custom(format!("invalid integer '{s}': {e}"))),
        }
    }
}

/// Optional 64-bit integer given as a number, a numeric string or `null`.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        Some(n) => n.into_i64().map(Some),
        None => Ok(None),
    }
}

/// Non-negative 32-bit integer; `null` becomes 0.
pub fn u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        Some(n) => {
            let v = n.into_i64::<D::Error>()?;
            u32::try_from(v).map_err(|_| D::Error::custom(format!("{v} is out of range")))
        }
        None => Ok(0),
    }
}

/// Optional non-negative 32-bit integer.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        Some(n) => {
            let v = n.into_i64::<D::Error>()?;
            u32::try_from(v)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("{v} is out of range")))
        }
        None => Ok(None),
    }
}

/// Row or column span; absent, `null` and 0 all mean a single cell.
pub fn span<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    u32_or_zero(deserializer).map(|v| v.max(1))
}
