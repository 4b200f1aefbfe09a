//! Lenient decimal parsing for producer-written files
//!
//! A single unparseable number must not sink a whole file, so these helpers
//! return `None` (or zero, for the serde adapters) instead of an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parse a plain or scientific-notation decimal, ignoring surrounding whitespace
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Same as [`parse_decimal`], defaulting to zero
pub fn decimal_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or_default()
}

/// Interpret a JSON number or numeric string as a decimal
pub fn from_json_value(value: &Value) -> Option<Decimal> {
    match value {
        // Going through the textual form keeps 0.1 as 0.1 instead of its f64 expansion
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// serde adapter: any unusable value becomes zero
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_json_value(&value).unwrap_or_default())
}

/// serde adapter: only a JSON number is accepted, anything else becomes `None`
pub fn number_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(parse_decimal(&n.to_string())),
        _ => Ok(None),
    }
}
