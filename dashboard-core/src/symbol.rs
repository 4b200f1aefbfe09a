//! Mapping from pair symbols and timeframes to on-disk locations

use crate::error::{DashboardError, DashboardResult};

/// Timeframe used when a request does not name one
pub const DEFAULT_TIMEFRAME: &str = "1d";

/// Directory name holding a pair's history, e.g. "BTC/USD" -> "btc_usd"
///
/// Re-normalizing an already normalized name returns it unchanged.
pub fn symbol_dir(symbol: &str) -> String {
    symbol.to_lowercase().replace('/', "_")
}

/// Check that a timeframe can be used as a single file-name component
pub fn validate_timeframe(timeframe: &str) -> DashboardResult<&str> {
    let tf = timeframe.trim();
    if tf.is_empty() || tf.contains('/') || tf.contains('\\') || tf.contains("..") {
        return Err(DashboardError::invalid_input(format!(
            "invalid timeframe: {:?}",
            timeframe
        )));
    }
    Ok(tf)
}
