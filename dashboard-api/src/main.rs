//! PnL Dashboard Server
//!
//! Serves the account history, holdings and per-coin charts written to disk
//! by the trading bot, and pushes a refresh signal to open pages when those
//! files change.

mod config;
mod routes;

use anyhow::Context;
use axum::http::{header, Method};
use dashboard_services::{DataPaths, DataWatcher, NotificationHub, ReadModelService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::DashboardConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub read_model: Arc<ReadModelService>,
    pub hub: NotificationHub,
}

impl AppState {
    pub fn new(paths: DataPaths, hub: NotificationHub) -> Self {
        Self {
            read_model: Arc::new(ReadModelService::new(paths)),
            hub,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dashboard_api=debug")),
        )
        .init();

    info!("Starting PnL Dashboard");

    let config = DashboardConfig::from_env().context("invalid configuration")?;
    info!("Configuration: {:?}", config);

    // The bot may not have written anything yet; make sure the tree exists
    let historical = config.data_dir.join("historical");
    std::fs::create_dir_all(&historical)
        .with_context(|| format!("cannot create {}", historical.display()))?;

    let hub = NotificationHub::new();
    let paths = DataPaths::new(&config.data_dir, &config.status_file);

    match config.refresh_poll {
        Some(interval) => {
            let watcher = DataWatcher::new(&config.data_dir, interval, hub.clone());
            tokio::spawn(watcher.run());
        }
        None => info!("Data directory polling disabled (REFRESH_POLL_SECS=0)"),
    }

    let state = AppState::new(paths, hub);

    // Configure CORS for external chart clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = routes::router(state, &config.static_dir)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
