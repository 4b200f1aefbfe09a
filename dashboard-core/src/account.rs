//! Account profit-and-loss history

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which value column of the account PnL file to chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlColumn {
    /// Absolute account value in USD
    Usd,
    /// PnL as a percentage of the starting value
    #[default]
    Pct,
}

impl PnlColumn {
    /// Zero-based CSV column holding this value
    pub fn index(&self) -> usize {
        match self {
            PnlColumn::Usd => 1,
            PnlColumn::Pct => 2,
        }
    }

    /// Axis label for charts
    pub fn display_name(&self) -> &'static str {
        match self {
            PnlColumn::Usd => "USD",
            PnlColumn::Pct => "PnL %",
        }
    }
}

impl fmt::Display for PnlColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for PnlColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usd" | "value" | "usd_value" => Ok(PnlColumn::Usd),
            "pct" | "percent" | "pct_pnl" => Ok(PnlColumn::Pct),
            _ => Err(format!("Unknown PnL column: {}", s)),
        }
    }
}

/// One day of account history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPnlPoint {
    /// Date label as written by the tracker (YYYY-MM-DD)
    pub date: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// Parallel label/value arrays, the shape chart libraries consume directly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPnlSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl From<&[AccountPnlPoint]> for AccountPnlSeries {
    fn from(points: &[AccountPnlPoint]) -> Self {
        use rust_decimal::prelude::ToPrimitive;

        let mut series = AccountPnlSeries {
            labels: Vec::with_capacity(points.len()),
            values: Vec::with_capacity(points.len()),
        };
        for point in points {
            series.labels.push(point.date.clone());
            series.values.push(point.value.to_f64().unwrap_or_default());
        }
        series
    }
}
