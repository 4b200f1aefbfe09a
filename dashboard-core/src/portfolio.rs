//! Portfolio holdings and strategy ranking structures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single holding from the portfolio snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Pair identifier as written by the producer (e.g. "BTC/USD")
    pub symbol: String,

    /// Signed quantity held
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
        }
    }
}

/// Score and last price for a coin in the strategy ranking file
///
/// Missing or non-numeric fields read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinScore {
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "crate::decimal::lenient"
    )]
    pub score: Decimal,

    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "crate::decimal::lenient"
    )]
    pub price: Decimal,
}

/// A coin from the strategy ranking, with its symbol attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCoin {
    pub symbol: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub score: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl RankedCoin {
    pub fn from_entry(symbol: impl Into<String>, entry: CoinScore) -> Self {
        Self {
            symbol: symbol.into(),
            score: entry.score,
            price: entry.price,
        }
    }
}
