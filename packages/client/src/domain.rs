//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// Configuration errors cannot be fixed by reconnecting.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `attempts_made` - Reconnection attempts made since the last successful connection
/// * `max_attempts` - The maximum number of attempts, `None` for unlimited
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(
    error: &ClientError,
    attempts_made: u32,
    max_attempts: Option<u32>,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    max_attempts.is_none_or(|max| attempts_made < max)
}

/// Whether the error happened after the connection had been established
pub fn was_connected(error: &ClientError) -> bool {
    matches!(error, ClientError::ConnectionLost(_))
}
