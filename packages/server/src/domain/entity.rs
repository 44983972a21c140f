//! Entities.

use super::value_object::{ChannelId, ChannelKind, PlaybackStatus, SourceUrl};

/// Playback metadata of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMetadata {
    pub source_url: SourceUrl,
    pub status: PlaybackStatus,
}

/// Canonical state of one channel. The server holds exactly one per channel ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState {
    pub id: ChannelId,
    pub kind: ChannelKind,
    pub metadata: ChannelMetadata,
}

impl ChannelState {
    /// A video channel in its start-up state: the given source, playing.
    pub fn new_video(id: ChannelId, source_url: SourceUrl) -> Self {
        Self {
            id,
            kind: ChannelKind::Video,
            metadata: ChannelMetadata {
                source_url,
                status: PlaybackStatus::Playing,
            },
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.metadata.status
    }

    pub fn set_status(&mut self, status: PlaybackStatus) {
        self.metadata.status = status;
    }

    pub fn is_synchronized(&self) -> bool {
        self.kind.is_synchronized()
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new_video(ChannelId::primary(), SourceUrl::default())
    }
}
