//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Channel ID is empty
    #[error("Channel ID must not be empty")]
    ChannelIdEmpty,

    /// Channel ID exceeds the maximum length
    #[error("Channel ID is too long ({length} > {max})")]
    ChannelIdTooLong { length: usize, max: usize },

    /// Source URL is empty
    #[error("Source URL must not be empty")]
    SourceUrlEmpty,

    /// Command is neither play nor pause
    #[error("Unknown playback command '{0}'")]
    UnknownCommand(String),
}

/// Channel store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No channel with the given ID is stored
    #[error("Channel '{0}' not found")]
    ChannelNotFound(String),
}

/// Connection registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Connection is not registered
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// Connection is registered but its transport is no longer open
    #[error("Failed to push to connection: {0}")]
    PushFailed(String),
}
