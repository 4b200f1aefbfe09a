//! Per-coin chart data: candles, trade markers and the assembled payload

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Candles
// ============================================================================

/// One OHLC candle
///
/// The timestamp is kept as the producer wrote it. Charts use it as a
/// category label, so it is never parsed or re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "t")]
    pub timestamp: String,

    #[serde(rename = "o", with = "rust_decimal::serde::float")]
    pub open: Decimal,

    #[serde(rename = "h", with = "rust_decimal::serde::float")]
    pub high: Decimal,

    #[serde(rename = "l", with = "rust_decimal::serde::float")]
    pub low: Decimal,

    #[serde(rename = "c", with = "rust_decimal::serde::float")]
    pub close: Decimal,
}

// ============================================================================
// Trade events
// ============================================================================

/// Direction of an executed trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            _ => Err(format!("Unknown trade side: {}", s)),
        }
    }
}

// Producers are inconsistent about casing ("buy", "BUY", "Sell")
impl<'de> Deserialize<'de> for TradeSide {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An executed trade, drawn as a marker on the coin chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub time: String,

    pub side: TradeSide,

    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "crate::decimal::lenient"
    )]
    pub price: Decimal,

    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "crate::decimal::lenient"
    )]
    pub qty: Decimal,
}

// ============================================================================
// Assembled payload
// ============================================================================

/// Everything the coin page needs in a single response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinPayload {
    pub symbol: String,

    /// Candles in file order
    pub series: Vec<Candle>,

    /// Executed trades; empty when the symbol has no trade log
    pub events: Vec<TradeEvent>,

    /// Stop-loss threshold from the position monitor, zero when unknown
    #[serde(with = "rust_decimal::serde::float")]
    pub stop_loss: Decimal,
}
