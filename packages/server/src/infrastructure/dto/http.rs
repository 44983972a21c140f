//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Number of open WebSocket connections
    pub clients: usize,
    /// ISO 8601 (UTC)
    pub timestamp: String,
}
