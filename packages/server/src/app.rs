//! Dependency wiring.

use std::sync::Arc;

use tandem_shared::time::SystemClock;

use crate::{
    config::ServerConfig,
    domain::{ChannelId, ChannelState},
    infrastructure::{
        connection_registry::WebSocketConnectionRegistry, repository::InMemoryChannelRepository,
    },
    ui::{Dispatcher, Server},
    usecase::{
        ApplyCommandUseCase, ConnectClientUseCase, DisconnectClientUseCase, GetChannelsUseCase,
        GetHealthUseCase, HandleMessageUseCase, RelayMessageUseCase,
    },
};

/// Build a server with fresh in-memory state.
///
/// Every call creates its own channel store and registry, so independent
/// servers never share canonical state.
pub fn build_server(config: &ServerConfig) -> Server {
    // Initialize dependencies in order:
    // 1. Repository
    // 2. ConnectionRegistry
    // 3. UseCases
    // 4. Dispatcher
    // 5. Server

    // 1. Create Repository (in-memory channel state store)
    let channel = ChannelState::new_video(ChannelId::primary(), config.video_url.clone());
    tracing::info!(
        "Channel {} ready: {} ({})",
        channel.id,
        channel.metadata.source_url.as_str(),
        channel.status()
    );
    let repository = Arc::new(InMemoryChannelRepository::new([channel]));

    // 2. Create ConnectionRegistry (WebSocket implementation)
    let registry = Arc::new(WebSocketConnectionRegistry::default());
    let clock = Arc::new(SystemClock);

    // 3. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        registry.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(registry.clone()));
    let apply_command_usecase = Arc::new(ApplyCommandUseCase::new(
        repository.clone(),
        registry.clone(),
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        registry.clone(),
        clock.clone(),
    ));
    let handle_message_usecase = Arc::new(HandleMessageUseCase::new(
        apply_command_usecase,
        relay_message_usecase,
        registry.clone(),
    ));
    let get_health_usecase = Arc::new(GetHealthUseCase::new(registry, clock));
    let get_channels_usecase = Arc::new(GetChannelsUseCase::new(repository));

    // 4. Create Dispatcher
    let dispatcher = Dispatcher::new(
        connect_client_usecase,
        disconnect_client_usecase,
        handle_message_usecase,
    );

    // 5. Create the server
    Server::new(dispatcher, get_health_usecase, get_channels_usecase)
}
