//! Core types for the PnL Dashboard
//!
//! This crate defines the shared data structures used across the dashboard,
//! including holdings, candles, account history and the error taxonomy the
//! file readers report with.

pub mod account;
pub mod coin;
pub mod decimal;
pub mod error;
pub mod portfolio;
pub mod symbol;

pub use account::{AccountPnlPoint, AccountPnlSeries, PnlColumn};
pub use coin::{Candle, CoinPayload, TradeEvent, TradeSide};
pub use error::{DashboardError, DashboardResult};
pub use portfolio::{CoinScore, Position, RankedCoin};
pub use symbol::{symbol_dir, validate_timeframe, DEFAULT_TIMEFRAME};
