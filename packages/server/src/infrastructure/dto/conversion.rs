//! Conversion logic between DTOs and domain entities.

use crate::domain::ChannelState;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChannelState> for dto::ChannelStateDto {
    fn from(model: ChannelState) -> Self {
        Self {
            kind: model.kind,
            metadata: dto::ChannelMetadataDto {
                video_url: model.metadata.source_url.into_string(),
                video_status: model.metadata.status,
            },
        }
    }
}

/// Build the channel payload (`{"<channel_id>": ChannelState, ...}`) for the given states.
pub fn to_channel_payload(states: impl IntoIterator<Item = ChannelState>) -> dto::ChannelPayload {
    states
        .into_iter()
        .map(|state| (state.id.as_str().to_string(), state.into()))
        .collect()
}
