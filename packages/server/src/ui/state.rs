//! Server state shared by the axum handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::usecase::{GetChannelsUseCase, GetHealthUseCase};

use super::dispatcher::ServerEvent;

/// Shared application state
pub struct AppState {
    /// Inbound queue of the dispatcher
    pub events: mpsc::UnboundedSender<ServerEvent>,
    /// GetHealthUseCase（ヘルスチェックのユースケース）
    pub get_health_usecase: Arc<GetHealthUseCase>,
    /// GetChannelsUseCase（正規状態参照のユースケース）
    pub get_channels_usecase: Arc<GetChannelsUseCase>,
}
