//! Server-push endpoints
//!
//! Each open connection owns one hub subscription. The subscription is
//! dropped with the connection, which removes it from the hub.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::get,
    Router,
};
use dashboard_services::NotificationHub;
use futures_util::{SinkExt, Stream, StreamExt};
use std::convert::Infallible;
use tracing::{debug, info};

use crate::AppState;

const REFRESH: &str = "refresh";

/// Create server-push routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(sse_handler))
        .route("/ws", get(ws_handler))
}

/// Server-sent events: one `refresh` event per coalesced notification
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hub.subscribe();
    info!("SSE client connected: {}", subscription.id());

    let stream = subscription
        .into_stream()
        .map(|()| Ok(Event::default().event(REFRESH).data(REFRESH)));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    debug!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Forward refresh signals until either side goes away
async fn handle_socket(socket: WebSocket, hub: NotificationHub) {
    let mut subscription = hub.subscribe();
    let id = subscription.id();
    info!("WebSocket client connected: {}", id);

    let (mut sender, mut receiver) = socket.split();

    let send_loop = async {
        while subscription.recv().await.is_some() {
            if sender.send(Message::Text(REFRESH.into())).await.is_err() {
                break;
            }
        }
    };

    // Clients have nothing to say; read only to notice the close
    let recv_loop = async {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    };

    tokio::select! {
        _ = send_loop => {}
        _ = recv_loop => {}
    }

    info!("WebSocket client disconnected: {}", id);
}
