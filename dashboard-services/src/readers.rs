//! File Readers
//!
//! Pure mappings from a path to typed records. Every reader distinguishes a
//! missing file (`DashboardError::NotFound`) from unreadable or malformed
//! content; whether a missing file is acceptable is the caller's decision.
//!
//! Readers are tolerant below the file level: short CSV rows are skipped and
//! unparseable numbers read as zero.

use dashboard_core::decimal::{decimal_or_zero, from_json_value, number_option, parse_decimal};
use dashboard_core::{
    AccountPnlPoint, Candle, CoinScore, DashboardError, DashboardResult, PnlColumn, TradeEvent,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Minimum fields for a candle row: timestamp, open, high, low, close
const CANDLE_FIELDS: usize = 5;

/// Minimum fields for an account row: date, usd_value, pct_pnl
const ACCOUNT_FIELDS: usize = 3;

/// Position monitor state; only a numeric stop-loss level is consumed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    #[serde(default, deserialize_with = "number_option")]
    pub stop_loss: Option<Decimal>,
}

// ============================================================================
// JSON readers
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> DashboardResult<T> {
    let file = File::open(path).map_err(|e| DashboardError::from_io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| DashboardError::decode(path, e))
}

/// Read the holdings snapshot: symbol -> quantity
pub fn read_portfolio(path: &Path) -> DashboardResult<HashMap<String, Decimal>> {
    let raw: HashMap<String, serde_json::Value> = read_json(path)?;

    Ok(raw
        .into_iter()
        .map(|(symbol, qty)| {
            let quantity = from_json_value(&qty).unwrap_or_else(|| {
                debug!("Non-numeric quantity for {} in {}", symbol, path.display());
                Decimal::ZERO
            });
            (symbol, quantity)
        })
        .collect())
}

/// Read the strategy ranking: symbol -> {score, price}
///
/// Every entry must be an object; a non-numeric field inside one reads as zero.
pub fn read_ranked_coins(path: &Path) -> DashboardResult<HashMap<String, CoinScore>> {
    let raw: HashMap<String, serde_json::Value> = read_json(path)?;

    raw.into_iter()
        .map(|(symbol, entry)| {
            if !entry.is_object() {
                return Err(DashboardError::decode(
                    path,
                    format!("ranking entry for {} is not an object", symbol),
                ));
            }
            let score: CoinScore =
                serde_json::from_value(entry).map_err(|e| DashboardError::decode(path, e))?;
            Ok((symbol, score))
        })
        .collect()
}

/// Read the executed-trade log for one pair
pub fn read_trade_events(path: &Path) -> DashboardResult<Vec<TradeEvent>> {
    read_json(path)
}

/// Read the position monitor state for one pair
pub fn read_monitor(path: &Path) -> DashboardResult<MonitorConfig> {
    read_json(path)
}

/// Read a JSON document without interpreting it
pub fn read_assets(path: &Path) -> DashboardResult<serde_json::Value> {
    read_json(path)
}

/// Read the single status line shown in page headers
pub fn read_status(path: &Path) -> DashboardResult<String> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| DashboardError::from_io(path, e))
}

// ============================================================================
// CSV readers
// ============================================================================

/// Read data rows from a headerless-or-headed CSV file
///
/// The first row is taken as a header only when its `key_column` does not
/// parse as a number, so files written without a header keep their first row.
/// Fields are decoded lossily: invalid UTF-8 spoils a field, never the file.
fn read_rows<T>(
    path: &Path,
    key_column: usize,
    min_fields: usize,
    mut map_row: impl FnMut(&[String]) -> T,
) -> DashboardResult<Vec<T>> {
    let file = File::open(path).map_err(|e| DashboardError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        let record = result.map_err(|e| DashboardError::decode(path, e))?;
        let fields: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();

        if index == 0
            && fields
                .get(key_column)
                .and_then(|field| parse_decimal(field))
                .is_none()
        {
            continue;
        }
        if fields.len() < min_fields {
            debug!("Skipping short row {} in {}", index + 1, path.display());
            continue;
        }

        rows.push(map_row(&fields));
    }

    Ok(rows)
}

/// Read a candle file: `[timestamp, open, high, low, close, ...]`
pub fn read_candles(path: &Path) -> DashboardResult<Vec<Candle>> {
    read_rows(path, 1, CANDLE_FIELDS, |fields| Candle {
        timestamp: fields[0].clone(),
        open: decimal_or_zero(&fields[1]),
        high: decimal_or_zero(&fields[2]),
        low: decimal_or_zero(&fields[3]),
        close: decimal_or_zero(&fields[4]),
    })
}

/// Read the account history: `[date, usd_value, pct_pnl, ...]`, one column
pub fn read_account_pnl(path: &Path, column: PnlColumn) -> DashboardResult<Vec<AccountPnlPoint>> {
    let idx = column.index();
    read_rows(path, idx, ACCOUNT_FIELDS, |fields| AccountPnlPoint {
        date: fields[0].clone(),
        value: decimal_or_zero(&fields[idx]),
    })
}
