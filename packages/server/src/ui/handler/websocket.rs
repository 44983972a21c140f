//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    ui::{
        dispatcher::{InboundFrame, ServerEvent},
        state::AppState,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the registry drops its sender or the socket write fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Register first so the snapshot is the first frame queued for this connection
    if state
        .events
        .send(ServerEvent::Connected {
            connection_id,
            sender: tx,
        })
        .is_err()
    {
        tracing::error!("Dispatcher is gone, dropping connection '{}'", connection_id);
        return;
    }
    tracing::info!("New client connected: '{}'", connection_id);

    let events = state.events.clone();

    // Spawn a task to forward frames from this client to the dispatcher
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            let frame = match msg {
                Message::Text(text) => InboundFrame::Text(text.as_str().to_string()),
                Message::Binary(data) => InboundFrame::Binary(data.to_vec()),
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
            };

            if events
                .send(ServerEvent::Message {
                    connection_id,
                    frame,
                })
                .is_err()
            {
                break;
            }
        }
    });

    // Spawn a task to push queued messages to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .events
        .send(ServerEvent::Disconnected { connection_id })
        .is_err()
    {
        tracing::warn!(
            "Dispatcher is gone, could not deregister '{}'",
            connection_id
        );
    }
}
