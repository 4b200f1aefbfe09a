//! JSON data endpoints consumed by the chart scripts

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dashboard_core::{DashboardError, PnlColumn, DEFAULT_TIMEFRAME};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::json_error;
use crate::AppState;

/// Query parameters for a coin payload
#[derive(Debug, Deserialize)]
pub struct CoinDataQuery {
    #[serde(default)]
    pub symbol: String,
    /// Candle timeframe, matching a file name under the pair's directory
    pub tf: Option<String>,
}

/// Query parameters for account history
#[derive(Debug, Deserialize)]
pub struct PnlQuery {
    /// "usd" for account value, "pct" for percentage PnL (default)
    pub mode: Option<String>,
}

impl PnlQuery {
    fn column(&self) -> Result<PnlColumn, DashboardError> {
        match self.mode.as_deref() {
            None | Some("") => Ok(PnlColumn::default()),
            Some(mode) => mode.parse().map_err(DashboardError::invalid_input),
        }
    }
}

/// Response for a manual refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub notified: usize,
}

/// Top-level endpoints fetched by the page scripts
pub fn chart_routes() -> Router<AppState> {
    Router::new()
        .route("/coin_data", get(coin_data))
        .route("/chart_data", get(chart_data))
        .route("/assets_usd", get(assets_usd))
}

/// Endpoints nested under /api
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/portfolio", get(portfolio))
        .route("/strategy", get(strategy))
        .route("/account_pnl", get(account_pnl))
        .route("/refresh", post(refresh))
}

/// Candles, trades and stop-loss for one pair
async fn coin_data(State(state): State<AppState>, Query(params): Query<CoinDataQuery>) -> Response {
    let tf = params.tf.as_deref().unwrap_or(DEFAULT_TIMEFRAME);
    debug!("Loading coin data for {} ({})", params.symbol, tf);

    match state.read_model.coin_payload(&params.symbol, tf) {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => json_error("coin_data", e),
    }
}

/// Account history as label/value arrays
async fn chart_data(State(state): State<AppState>, Query(params): Query<PnlQuery>) -> Response {
    let column = match params.column() {
        Ok(column) => column,
        Err(e) => return json_error("chart_data", e),
    };
    debug!("Loading account chart ({})", column);

    match state.read_model.account_series(column) {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => json_error("chart_data", e),
    }
}

/// Account history as date/value points
async fn account_pnl(State(state): State<AppState>, Query(params): Query<PnlQuery>) -> Response {
    let column = match params.column() {
        Ok(column) => column,
        Err(e) => return json_error("account_pnl", e),
    };
    debug!("Loading account history ({})", column);

    match state.read_model.account_pnl(column) {
        Ok(points) => (StatusCode::OK, Json(points)).into_response(),
        Err(e) => json_error("account_pnl", e),
    }
}

/// Per-asset USD breakdown, served as written
async fn assets_usd(State(state): State<AppState>) -> Response {
    match state.read_model.assets() {
        Ok(assets) => (StatusCode::OK, Json(assets)).into_response(),
        Err(e) => json_error("assets_usd", e),
    }
}

async fn portfolio(State(state): State<AppState>) -> Response {
    match state.read_model.portfolio() {
        Ok(positions) => (StatusCode::OK, Json(positions)).into_response(),
        Err(e) => json_error("portfolio", e),
    }
}

async fn strategy(State(state): State<AppState>) -> Response {
    match state.read_model.ranked_coins() {
        Ok(coins) => (StatusCode::OK, Json(coins)).into_response(),
        Err(e) => json_error("strategy", e),
    }
}

/// Let an external producer announce new data
async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let notified = state.hub.broadcast();
    info!("Manual refresh notified {} subscriber(s)", notified);
    Json(RefreshResponse { notified })
}
