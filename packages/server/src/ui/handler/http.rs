//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{
        conversion::to_channel_payload, http::HealthDto, websocket::ChannelPayload,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let report = state.get_health_usecase.execute().await;
    Json(HealthDto {
        status: "ok".to_string(),
        clients: report.clients,
        timestamp: report.timestamp,
    })
}

/// Current canonical state of the synchronized channels (read-only)
pub async fn get_channels(State(state): State<Arc<AppState>>) -> Json<ChannelPayload> {
    let channels = state.get_channels_usecase.execute().await;
    Json(to_channel_payload(channels))
}
