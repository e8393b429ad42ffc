//! Live transaction stream over WebSocket
//!
//! Each connection gets its own broadcast subscription and receives every
//! transaction accepted after the upgrade, as one JSON text message per
//! record. Nothing published before the upgrade is replayed; a viewer
//! catches up via `GET /api/transactions` first, then subscribes, per the
//! snapshot-then-subscribe protocol.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut live = state.broadcaster.subscribe();
    let (mut sender, mut receiver) = socket.split();

    debug!("viewer connected to live stream");

    loop {
        tokio::select! {
            result = live.recv() => match result {
                Ok(tx) => {
                    let payload = match serde_json::to_string(&tx) {
                        Ok(payload) => payload,
                        Err(err) => {
                            warn!(%err, id = %tx.id, "failed to serialize transaction, skipping");
                            continue;
                        }
                    };
                    // A failed delivery only ends this viewer's session;
                    // the publisher and other subscribers are unaffected.
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    // This viewer lost events; partial replay does not
                    // exist, so close and let it reconnect through a
                    // fresh snapshot.
                    warn!(missed, "viewer lagged behind live stream, disconnecting");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
                Err(RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Viewers do not speak; ignore pings and stray frames.
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("viewer disconnected from live stream");
}
