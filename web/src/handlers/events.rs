//! WebSocket handler streaming order-status changes.
//!
//! One-directional: the server pushes a JSON `{"orderId": ..., "status": ...}`
//! frame to every connected client after each successful status change.
//! Delivery is fire-and-forget; a client that falls behind the broadcast
//! channel capacity observes a lag error, is dropped, and can reconnect.

use crate::state::AppState;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info};

/// `GET /api/ws` — upgrade and start streaming status events.
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn handle(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    info!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle WebSocket connection lifecycle.
///
/// Spawns two tasks: one streaming feed events to the client, one draining
/// client frames so close/ping are honored.
async fn handle_socket(socket: WebSocket, state: AppState) {
    info!("WebSocket connection established");

    let (mut sender, mut receiver) = socket.split();
    let mut events = state.feed.subscribe();

    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    // The client is too slow to keep the full stream; drop
                    // it rather than replaying stale statuses.
                    debug!(missed, "WebSocket subscriber lagged, closing");
                    break;
                },
                Err(RecvError::Closed) => break,
            };

            let message = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    error!(error = %e, "Failed to serialize status event");
                    continue;
                },
            };

            if sender.send(message).await.is_err() {
                // Client disconnected
                break;
            }
        }

        debug!("WebSocket send task terminated");
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => {
                    info!("Client requested close");
                    break;
                },
                Message::Ping(_) | Message::Pong(_) => {
                    // Axum answers pings automatically
                },
                Message::Text(_) | Message::Binary(_) => {
                    debug!("Ignoring inbound frame on one-directional feed");
                },
            }
        }

        debug!("WebSocket receive task terminated");
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        },
        _ = (&mut recv_task) => {
            send_task.abort();
        },
    }

    info!("WebSocket connection closed");
}
