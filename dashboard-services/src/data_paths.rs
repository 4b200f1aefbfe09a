//! Locations of the files the dashboard consumes

use dashboard_core::symbol_dir;
use std::path::{Path, PathBuf};

/// Resolves every consumed file relative to a data directory
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
    status_file: PathBuf,
}

impl DataPaths {
    /// Create paths rooted at `root`, with the status line read from `status_file`
    pub fn new(root: impl Into<PathBuf>, status_file: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            status_file: status_file.into(),
        }
    }

    /// Paths rooted at `root`, with the status file inside it
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let status_file = root.join("status.txt");
        Self { root, status_file }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn portfolio(&self) -> PathBuf {
        self.root.join("portfolio.json")
    }

    pub fn ranked_coins(&self) -> PathBuf {
        self.root.join("ranked_coins.json")
    }

    pub fn account_pnl(&self) -> PathBuf {
        self.root.join("account_pnl.csv")
    }

    pub fn assets_usd(&self) -> PathBuf {
        self.root.join("assets_usd.json")
    }

    pub fn status(&self) -> &Path {
        &self.status_file
    }

    /// Directory holding one pair's candles, trades and monitor state
    pub fn historical_dir(&self, symbol: &str) -> PathBuf {
        self.root.join("historical").join(symbol_dir(symbol))
    }

    /// Candle file for a pair; `timeframe` must already be validated
    pub fn candles(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.historical_dir(symbol).join(format!("{}.csv", timeframe))
    }

    pub fn trade_events(&self, symbol: &str) -> PathBuf {
        self.historical_dir(symbol).join("events.json")
    }

    pub fn monitor(&self, symbol: &str) -> PathBuf {
        self.historical_dir(symbol).join("monitor.json")
    }
}
