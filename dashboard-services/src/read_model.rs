//! Read-Model Service
//!
//! Composes the file readers into the shapes the pages and JSON endpoints
//! serve. Required resources propagate their failure untouched; optional
//! ones (trade log, monitor state, status line) degrade to empty defaults.

use dashboard_core::{
    validate_timeframe, AccountPnlPoint, AccountPnlSeries, CoinPayload, CoinScore,
    DashboardError, DashboardResult, PnlColumn, Position, RankedCoin,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::data_paths::DataPaths;
use crate::readers;

/// Builds response payloads from the files under a data directory
#[derive(Debug, Clone)]
pub struct ReadModelService {
    paths: DataPaths,
}

impl ReadModelService {
    /// Create a new ReadModelService
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Holdings sorted by symbol
    pub fn portfolio(&self) -> DashboardResult<Vec<Position>> {
        let raw = readers::read_portfolio(&self.paths.portfolio())?;
        Ok(sort_positions(raw))
    }

    /// Strategy ranking, best score first
    pub fn ranked_coins(&self) -> DashboardResult<Vec<RankedCoin>> {
        let raw = readers::read_ranked_coins(&self.paths.ranked_coins())?;
        Ok(rank_coins(raw))
    }

    /// Candles, executed trades and stop-loss level for one pair
    ///
    /// Fails only when the candle file is missing or unreadable.
    pub fn coin_payload(&self, symbol: &str, timeframe: &str) -> DashboardResult<CoinPayload> {
        if symbol.trim().is_empty() {
            return Err(DashboardError::invalid_input("symbol is required"));
        }
        if symbol.contains("..") || symbol.contains('\\') {
            return Err(DashboardError::invalid_input(format!(
                "invalid symbol: {:?}",
                symbol
            )));
        }
        let timeframe = validate_timeframe(timeframe)?;

        let series = readers::read_candles(&self.paths.candles(symbol, timeframe))?;

        let events = optional(
            "trade log",
            symbol,
            readers::read_trade_events(&self.paths.trade_events(symbol)),
        );

        let stop_loss = optional(
            "monitor state",
            symbol,
            readers::read_monitor(&self.paths.monitor(symbol)),
        )
        .stop_loss
        .unwrap_or(Decimal::ZERO);

        Ok(CoinPayload {
            symbol: symbol.to_string(),
            series,
            events,
            stop_loss,
        })
    }

    /// Account history for one value column, in file order
    pub fn account_pnl(&self, column: PnlColumn) -> DashboardResult<Vec<AccountPnlPoint>> {
        readers::read_account_pnl(&self.paths.account_pnl(), column)
    }

    /// Account history as parallel label/value arrays
    pub fn account_series(&self, column: PnlColumn) -> DashboardResult<AccountPnlSeries> {
        let points = self.account_pnl(column)?;
        Ok(AccountPnlSeries::from(points.as_slice()))
    }

    /// Per-asset USD breakdown, passed through as written
    pub fn assets(&self) -> DashboardResult<serde_json::Value> {
        readers::read_assets(&self.paths.assets_usd())
    }

    /// Bot status line for page headers; empty when unavailable
    pub fn status(&self) -> String {
        optional("status line", "dashboard", readers::read_status(self.paths.status()))
    }
}

/// Materialize the holdings map in ascending symbol order
pub fn sort_positions(raw: HashMap<String, Decimal>) -> Vec<Position> {
    let mut positions: Vec<Position> = raw
        .into_iter()
        .map(|(symbol, quantity)| Position::new(symbol, quantity))
        .collect();
    positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    positions
}

/// Materialize the ranking map by descending score, ties by ascending symbol
pub fn rank_coins(raw: HashMap<String, CoinScore>) -> Vec<RankedCoin> {
    let mut coins: Vec<RankedCoin> = raw
        .into_iter()
        .map(|(symbol, entry)| RankedCoin::from_entry(symbol, entry))
        .collect();
    coins.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));
    coins
}

fn optional<T: Default>(what: &str, symbol: &str, result: DashboardResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) if e.is_not_found() => {
            debug!("No {} for {}", what, symbol);
            T::default()
        }
        Err(e) => {
            warn!("Ignoring unreadable {} for {}: {}", what, symbol, e);
            T::default()
        }
    }
}
