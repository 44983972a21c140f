//! Value objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Channel ID of the synchronized video channel.
pub const PRIMARY_CHANNEL_ID: &str = "channel_1";

/// Identifier of a logical channel (e.g. `channel_1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::ChannelIdEmpty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ValueObjectError::ChannelIdTooLong {
                length: value.len(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(value))
    }

    /// The synchronized video channel.
    pub fn primary() -> Self {
        Self(PRIMARY_CHANNEL_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ChannelId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned identifier of one accepted socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind tag of a channel. Only video channels take part in synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Video,
}

impl ChannelKind {
    pub fn is_synchronized(&self) -> bool {
        matches!(self, ChannelKind::Video)
    }
}

/// Canonical play/pause status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    Paused,
}

impl PlaybackStatus {
    /// Translate a wire command (`play` / `pause`) into the status it requests.
    pub fn from_command(command: &str) -> Result<Self, ValueObjectError> {
        match command {
            "play" => Ok(PlaybackStatus::Playing),
            "pause" => Ok(PlaybackStatus::Paused),
            other => Err(ValueObjectError::UnknownCommand(other.to_string())),
        }
    }

    /// The wire command that requests this status.
    pub fn as_command(&self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "play",
            PlaybackStatus::Paused => "pause",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locator of the media resource played on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrl(String);

impl SourceUrl {
    pub const DEFAULT: &'static str =
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::SourceUrlEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for SourceUrl {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}
