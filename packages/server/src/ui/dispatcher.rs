//! Single-consumer event loop.
//!
//! Connection tasks never touch the channel store or the registry directly.
//! They forward transport events into one queue, and the dispatcher runs each
//! event (mutation plus the whole broadcast) to completion before taking the
//! next one. This gives a total order of applied commands across connections.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, PusherChannel},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, HandleMessageUseCase, MessageOutcome,
    },
};

/// Payload of a data frame as received from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary(Vec<u8>),
}

/// Transport event forwarded by a connection task
#[derive(Debug)]
pub enum ServerEvent {
    Connected {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Message {
        connection_id: ConnectionId,
        frame: InboundFrame,
    },
    Disconnected {
        connection_id: ConnectionId,
    },
}

pub struct Dispatcher {
    connect_client_usecase: Arc<ConnectClientUseCase>,
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    handle_message_usecase: Arc<HandleMessageUseCase>,
}

impl Dispatcher {
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        handle_message_usecase: Arc<HandleMessageUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            handle_message_usecase,
        }
    }

    /// Spawn the event loop and return its inbound queue.
    ///
    /// The loop ends once every sender of the queue has been dropped.
    pub fn spawn(self) -> (mpsc::UnboundedSender<ServerEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(rx));
        (tx, handle)
    }

    pub async fn run(self, mut events: mpsc::UnboundedReceiver<ServerEvent>) {
        while let Some(event) = events.recv().await {
            self.dispatch(event).await;
        }
        tracing::debug!("Dispatcher stopped");
    }

    /// Process one event to completion.
    ///
    /// Returns the outcome for message events, `None` otherwise.
    pub async fn dispatch(&self, event: ServerEvent) -> Option<MessageOutcome> {
        match event {
            ServerEvent::Connected {
                connection_id,
                sender,
            } => {
                match self
                    .connect_client_usecase
                    .execute(connection_id, sender)
                    .await
                {
                    Ok(()) => tracing::info!("Sent snapshot to '{}'", connection_id),
                    Err(e) => tracing::warn!("Connection '{}': {}", connection_id, e),
                }
                None
            }
            ServerEvent::Message {
                connection_id,
                frame,
            } => {
                let outcome = match frame {
                    InboundFrame::Text(text) => {
                        tracing::debug!("Received text from '{}': {}", connection_id, text);
                        self.handle_message_usecase
                            .execute(connection_id, &text)
                            .await
                    }
                    InboundFrame::Binary(data) => {
                        tracing::debug!(
                            "Received {} bytes from '{}'",
                            data.len(),
                            connection_id
                        );
                        self.handle_message_usecase
                            .execute_binary(connection_id, &data)
                            .await
                    }
                };
                tracing::debug!("Message from '{}' -> {:?}", connection_id, outcome);
                Some(outcome)
            }
            ServerEvent::Disconnected { connection_id } => {
                let remaining = self
                    .disconnect_client_usecase
                    .execute(&connection_id)
                    .await;
                tracing::info!(
                    "Client '{}' disconnected ({} remaining)",
                    connection_id,
                    remaining
                );
                None
            }
        }
    }
}
