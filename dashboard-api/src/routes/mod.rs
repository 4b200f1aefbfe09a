//! Route definitions

mod data;
mod events;
mod health;
mod pages;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use dashboard_core::DashboardError;
use serde::Serialize;
use std::path::Path;
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create JSON API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(data::api_routes())
        .merge(health::routes())
}

/// Assemble the full application router
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(pages::routes())
        .merge(data::chart_routes())
        .merge(events::routes())
        .nest("/api", api_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Status code for a failed required resource
fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
        DashboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed request server-side and turn it into a JSON error body
fn json_error(context: &str, err: DashboardError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("{} failed: {}", context, err);
    } else {
        warn!("{} failed: {}", context, err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use dashboard_services::{DataPaths, NotificationHub};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct Fixture {
        dir: TempDir,
        hub: NotificationHub,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("static/js")).unwrap();
            fs::write(dir.path().join("static/js/home.js"), "// home").unwrap();
            Self {
                dir,
                hub: NotificationHub::new(),
            }
        }

        fn write(&self, rel: &str, contents: &str) {
            let path = self.dir.path().join("data").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn app(&self) -> Router {
            let paths = DataPaths::rooted(self.dir.path().join("data"));
            let state = AppState::new(paths, self.hub.clone());
            router(state, &self.dir.path().join("static"))
        }

        async fn get(&self, uri: &str) -> (StatusCode, String) {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
            let response = self.app().oneshot(request).await.unwrap();
            let status = response.status();
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, String::from_utf8(body.to_vec()).unwrap())
        }
    }

    fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_coin_data_payload() {
        let fx = Fixture::new();
        fx.write(
            "historical/btc_usd/1d.csv",
            "timestamp,open,high,low,close\n2024-05-01,1,2,0.5,1.5\n",
        );
        fx.write("historical/btc_usd/monitor.json", r#"{"stop_loss": 0.75}"#);

        let (status, body) = fx.get("/coin_data?symbol=BTC%2FUSD").await;
        assert_eq!(status, StatusCode::OK);

        let payload = json(&body);
        assert_eq!(payload["symbol"], "BTC/USD");
        assert_eq!(payload["series"][0]["t"], "2024-05-01");
        assert_eq!(payload["series"][0]["c"].as_f64(), Some(1.5));
        assert_eq!(payload["events"].as_array().unwrap().len(), 0);
        assert_eq!(payload["stop_loss"].as_f64(), Some(0.75));
    }

    #[tokio::test]
    async fn test_coin_data_missing_candles_is_404() {
        let fx = Fixture::new();
        let (status, body) = fx.get("/coin_data?symbol=ETH%2FUSD&tf=4h").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json(&body)["error"].as_str().unwrap().contains("4h.csv"));
    }

    #[tokio::test]
    async fn test_coin_data_rejects_path_timeframe() {
        let fx = Fixture::new();
        let (status, _) = fx.get("/coin_data?symbol=BTC%2FUSD&tf=..%2Fsecret").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chart_data_modes() {
        let fx = Fixture::new();
        fx.write(
            "account_pnl.csv",
            "date,usd_value,pct_pnl\n2024-05-01,1000,0\n2024-05-02,1100,10\n",
        );

        let (status, body) = fx.get("/chart_data").await;
        assert_eq!(status, StatusCode::OK);
        let chart = json(&body);
        assert_eq!(chart["labels"][1], "2024-05-02");
        assert_eq!(chart["values"][1].as_f64(), Some(10.0));

        let (_, body) = fx.get("/chart_data?mode=usd").await;
        assert_eq!(json(&body)["values"][1].as_f64(), Some(1100.0));

        let (status, _) = fx.get("/chart_data?mode=both").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chart_data_missing_file() {
        let fx = Fixture::new();
        let (status, _) = fx.get("/chart_data").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_lists_are_sorted() {
        let fx = Fixture::new();
        fx.write("portfolio.json", r#"{"SOL/USD": 3, "ADA/USD": 100}"#);
        fx.write(
            "ranked_coins.json",
            r#"{"A": {"score": 3, "price": 1}, "B": {"score": 5, "price": 2}, "C": {"score": 1, "price": 3}}"#,
        );

        let (_, body) = fx.get("/api/portfolio").await;
        let positions = json(&body);
        assert_eq!(positions[0]["symbol"], "ADA/USD");
        assert_eq!(positions[1]["symbol"], "SOL/USD");

        let (_, body) = fx.get("/api/strategy").await;
        let coins: Vec<String> = json(&body)
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["symbol"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(coins, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_assets_passthrough() {
        let fx = Fixture::new();
        let (status, _) = fx.get("/assets_usd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        fx.write("assets_usd.json", r#"{"BTC": 1234.5, "USD": 50}"#);
        let (status, body) = fx.get("/assets_usd").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["BTC"].as_f64(), Some(1234.5));
    }

    #[tokio::test]
    async fn test_portfolio_page() {
        let fx = Fixture::new();
        fx.write("portfolio.json", r#"{"BTC/USD": 0.5, "<b>X</b>": 1}"#);
        fx.write("status.txt", "running");

        let (status, body) = fx.get("/portfolio").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/coin?symbol=BTC%2FUSD&amp;from=portfolio"));
        assert!(body.contains("&lt;b&gt;X&lt;/b&gt;"));
        assert!(body.contains("running"));
    }

    #[test]
    fn test_status_for_each_error_kind() {
        assert_eq!(
            status_for(&DashboardError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DashboardError::invalid_input("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DashboardError::decode("x.json", "bad")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&DashboardError::Io {
                path: "x".into(),
                message: "denied".into(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_strategy_malformed_entry_is_500() {
        let fx = Fixture::new();
        fx.write("ranked_coins.json", r#"{"A": {"score": 3, "price": 1}, "B": "garbage"}"#);

        let (status, body) = fx.get("/api/strategy").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json(&body)["error"].as_str().unwrap().contains("ranked_coins.json"));

        let (status, body) = fx.get("/strategy").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("cannot load file"));
    }

    #[tokio::test]
    async fn test_strategy_page_missing_file() {
        let fx = Fixture::new();
        let (status, body) = fx.get("/strategy").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("cannot load file"));
    }

    #[tokio::test]
    async fn test_coin_page_back_link() {
        let fx = Fixture::new();
        let (_, body) = fx.get("/coin?symbol=BTC%2FUSD&from=strategy").await;
        assert!(body.contains(r#"href="/strategy""#));

        let (_, body) = fx.get("/coin?symbol=BTC%2FUSD").await;
        assert!(body.contains(r#"href="/portfolio""#));
    }

    #[tokio::test]
    async fn test_home_page_and_static() {
        let fx = Fixture::new();
        let (status, body) = fx.get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/static/js/home.js"));

        let (status, body) = fx.get("/static/js/home.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "// home");
    }

    #[tokio::test]
    async fn test_refresh_endpoint_broadcasts() {
        let fx = Fixture::new();
        let mut sub = fx.hub.subscribe();

        let request = Request::post("/api/refresh").body(Body::empty()).unwrap();
        let (status, body) = fx.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["notified"], 1);
        assert!(sub.try_recv());
    }

    #[tokio::test]
    async fn test_health_reports_subscribers() {
        let fx = Fixture::new();
        let _sub = fx.hub.subscribe();
        let (status, body) = fx.get("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["subscribers"], 1);

        let (status, _) = fx.get("/api/health/live").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_events_stream_headers() {
        let fx = Fixture::new();
        let response = fx
            .app()
            .oneshot(Request::get("/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert_eq!(fx.hub.subscriber_count(), 1);

        drop(response);
        assert_eq!(fx.hub.subscriber_count(), 0);
    }
}
