//! Shape coercions shared by the payload schemas.
//!
//! The API is loose about a few scalars (ids sometimes arrive as numbers,
//! ratings sometimes as strings). These helpers accept those variants and
//! nothing else; any other shape is a decode error.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// Accept `"abc"` or `42` for an identifier.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) if !s.trim().is_empty() => Ok(s),
        StringOrNumber::String(_) => Err(de::Error::custom("id must not be empty")),
        StringOrNumber::Int(n) => Ok(n.to_string()),
        StringOrNumber::Float(_) => Err(de::Error::custom("id must be a string or integer")),
    }
}

/// Accept a number or numeric string, clamped to the 0-5 star scale.
pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid rating '{}'", s)))?,
        StringOrNumber::Int(n) => n as f64,
        StringOrNumber::Float(f) => f,
    };
    if value.is_nan() {
        return Err(de::Error::custom("rating must be a number"));
    }
    Ok(value.clamp(0.0, 5.0))
}

/// Like `rating`, but an absent or null field becomes `0.0`.
pub fn rating_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "rating")] f64);

    Ok(Option::<Wrapped>::deserialize(deserializer)?
        .map(|w| w.0)
        .unwrap_or(0.0))
}

/// A collection payload: either a bare array or `{"items": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Wrapped { items } => items,
        }
    }
}
