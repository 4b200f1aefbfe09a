//! HTML pages
//!
//! Tables are rendered server-side; charts are drawn by the scripts under
//! /static/js from the JSON endpoints. Every page reloads itself when the
//! server pushes a refresh.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use dashboard_core::{Position, RankedCoin};
use serde::Deserialize;
use std::fmt::Write;
use tracing::error;

use crate::AppState;

/// Query parameters for the coin page
#[derive(Debug, Deserialize)]
pub struct CoinPageQuery {
    #[serde(default)]
    pub symbol: String,
    /// Page the user came from ("portfolio" or "strategy")
    pub from: Option<String>,
}

/// Back link and bot status shown at the top of every page
struct Header<'a> {
    back_url: &'a str,
    back_label: &'a str,
    status: String,
}

/// Create page routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/strategy", get(strategy))
        .route("/portfolio", get(portfolio))
        .route("/coin", get(coin))
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let header = Header {
        back_url: "/",
        back_label: "Home",
        status: state.read_model.status(),
    };

    let body = r#"<section>
  <div id="pnl-chart" class="chart"></div>
</section>
<section>
  <h2>Assets (USD)</h2>
  <table id="assets"><tbody></tbody></table>
</section>
<nav class="links">
  <a href="/portfolio">Portfolio</a>
  <a href="/strategy">Strategy</a>
</nav>"#;

    Html(layout("Account", &header, body, &["/static/js/home.js"]))
}

async fn strategy(State(state): State<AppState>) -> Response {
    let coins = match state.read_model.ranked_coins() {
        Ok(coins) => coins,
        Err(e) => return load_failure("strategy", e),
    };

    let header = Header {
        back_url: "/",
        back_label: "← Home",
        status: state.read_model.status(),
    };
    Html(layout("Strategy", &header, &strategy_table(&coins), &[])).into_response()
}

async fn portfolio(State(state): State<AppState>) -> Response {
    let positions = match state.read_model.portfolio() {
        Ok(positions) => positions,
        Err(e) => return load_failure("portfolio", e),
    };

    let header = Header {
        back_url: "/",
        back_label: "← Home",
        status: state.read_model.status(),
    };
    Html(layout("Portfolio", &header, &portfolio_table(&positions), &[])).into_response()
}

async fn coin(State(state): State<AppState>, Query(params): Query<CoinPageQuery>) -> Html<String> {
    let (back_url, back_label) = match params.from.as_deref() {
        Some("strategy") => ("/strategy", "← Strategy"),
        _ => ("/portfolio", "← Portfolio"),
    };
    let header = Header {
        back_url,
        back_label,
        status: state.read_model.status(),
    };

    let symbol = escape(&params.symbol);
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h2>{symbol}</h2>
<div class="timeframes">
  <button data-tf="1h">1h</button>
  <button data-tf="4h">4h</button>
  <button data-tf="1d" class="active">1d</button>
</div>
<div id="coin-chart" class="chart" data-symbol="{symbol}"></div>
<div id="events-list"></div>"#
    );

    Html(layout(&params.symbol, &header, &body, &["/static/js/coin.js"]))
}

/// Plain-text 500 for pages whose required file cannot be read
fn load_failure(page: &str, err: dashboard_core::DashboardError) -> Response {
    error!("{} page failed: {}", page, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("cannot load file: {}", err),
    )
        .into_response()
}

fn strategy_table(coins: &[RankedCoin]) -> String {
    let mut rows = String::new();
    for (i, coin) in coins.iter().enumerate() {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            escape(&coin_link(&coin.symbol, "strategy")),
            escape(&coin.symbol),
            coin.score.round_dp(4),
            coin.price.normalize(),
        );
    }

    format!(
        "<table>\n<thead><tr><th>#</th><th>Symbol</th><th>Score</th><th>Price</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>",
        rows
    )
}

fn portfolio_table(positions: &[Position]) -> String {
    let mut rows = String::new();
    for position in positions {
        let _ = write!(
            rows,
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td></tr>\n",
            escape(&coin_link(&position.symbol, "portfolio")),
            escape(&position.symbol),
            position.quantity.normalize(),
        );
    }

    format!(
        "<table>\n<thead><tr><th>Symbol</th><th>Quantity</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>",
        rows
    )
}

fn coin_link(symbol: &str, from: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(symbol.as_bytes()).collect();
    format!("/coin?symbol={}&from={}", encoded, from)
}

fn layout(title: &str, header: &Header<'_>, body: &str, scripts: &[&str]) -> String {
    let mut script_tags = String::new();
    for src in scripts {
        let _ = writeln!(script_tags, r#"<script src="{}"></script>"#, escape(src));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/static/css/style.css">
<script src="https://cdn.jsdelivr.net/npm/echarts@5.4.2/dist/echarts.min.js"></script>
</head>
<body>
<header>
  <a class="back" href="{back_url}">{back_label}</a>
  <span class="status">{status}</span>
</header>
<main>
{body}
</main>
{script_tags}<script>
  new EventSource("/events").addEventListener("refresh", () => window.location.reload());
</script>
</body>
</html>
"#,
        title = escape(title),
        back_url = escape(header.back_url),
        back_label = escape(header.back_label),
        status = escape(&header.status),
        body = body,
        script_tags = script_tags,
    )
}

/// Escape text for use in HTML bodies and double-quoted attributes
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
