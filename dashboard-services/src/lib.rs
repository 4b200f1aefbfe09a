//! Business logic services for the PnL Dashboard
//!
//! This crate reads the snapshot files written by the trading bot, turns
//! them into response payloads, and notifies connected clients when those
//! files change.

pub mod data_paths;
pub mod hub;
pub mod read_model;
pub mod readers;
pub mod watcher;

pub use data_paths::DataPaths;
pub use hub::{NotificationHub, SubscriberId, Subscription};
pub use read_model::{rank_coins, sort_positions, ReadModelService};
pub use readers::MonitorConfig;
pub use watcher::{DataWatcher, DirFingerprint};
