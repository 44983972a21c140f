//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{GetChannelsUseCase, GetHealthUseCase};

use super::{
    dispatcher::Dispatcher,
    handler::{
        http::{get_channels, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket synchronization server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(dispatcher, get_health_usecase, get_channels_usecase);
/// server.run("0.0.0.0:3000").await?;
/// ```
pub struct Server {
    /// Dispatcher（全イベントを直列に処理するイベントループ）
    dispatcher: Dispatcher,
    /// GetHealthUseCase（ヘルスチェックのユースケース）
    get_health_usecase: Arc<GetHealthUseCase>,
    /// GetChannelsUseCase（正規状態参照のユースケース）
    get_channels_usecase: Arc<GetChannelsUseCase>,
}

impl Server {
    pub fn new(
        dispatcher: Dispatcher,
        get_health_usecase: Arc<GetHealthUseCase>,
        get_channels_usecase: Arc<GetChannelsUseCase>,
    ) -> Self {
        Self {
            dispatcher,
            get_health_usecase,
            get_channels_usecase,
        }
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(bind_addr).await?;

        tracing::info!("Server running on http://{}", listener.local_addr()?);
        tracing::info!("WebSocket server ready at ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (events, dispatcher_handle) = self.dispatcher.spawn();

        let app_state = Arc::new(AppState {
            events,
            get_health_usecase: self.get_health_usecase,
            get_channels_usecase: self.get_channels_usecase,
        });

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/", get(websocket_handler))
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/api/channels", get(get_channels))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        // Connection tasks hold the remaining queue senders; stop the loop explicitly
        dispatcher_handle.abort();
        result
    }
}
