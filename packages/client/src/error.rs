//! Error types for the Tandem client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not establish the WebSocket connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The established connection was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// The configured server URL is not usable
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),
}

/// Failures reported by a media element
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// Playback was refused by the autoplay policy until the user interacts
    #[error("Playback not allowed without user interaction")]
    NotAllowed,

    /// Any other playback failure
    #[error("Playback failed: {0}")]
    Failed(String),
}
