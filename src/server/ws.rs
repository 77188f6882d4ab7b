//! Live document stream.
//!
//! On connect the session sends the current text, then forwards every
//! broadcast. Text frames from the client are committed as edits and pushed
//! to the remote.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};

use super::AppState;
use crate::sync::Subscription;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(socket: WebSocket, state: AppState) {
    let Subscription { id, mut receiver } = state.hub.subscribe().await;
    let (mut sender, mut inbound) = socket.split();

    let initial = match state.engine.load_initial().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Initial load for subscriber {} failed: {}", id, e);
            state.engine.current_text().await.unwrap_or_default()
        }
    };

    if sender.send(Message::Text(initial.into())).await.is_ok() {
        loop {
            tokio::select! {
                outgoing = receiver.recv() => match outgoing {
                    Some(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    // dropped by the hub
                    None => break,
                },
                incoming = inbound.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = state.engine.apply_update(text.as_str(), true).await {
                            tracing::warn!("Edit from subscriber {} rejected: {}", id, e);
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    state.hub.unsubscribe(id).await;
}
