//! InMemory Channel Repository 実装
//!
//! ドメイン層が定義する ChannelRepository trait の具体的な実装。
//! BTreeMap をインメモリ DB として使用します。永続化はしないため、
//! プロセス起動のたびに初期状態へ戻ります。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChannelId, ChannelRepository, ChannelState, PlaybackStatus, RepositoryError};

/// インメモリ Channel Repository 実装
pub struct InMemoryChannelRepository {
    /// チャンネル ID ごとの正規状態
    channels: Mutex<BTreeMap<ChannelId, ChannelState>>,
}

impl InMemoryChannelRepository {
    /// 与えられたチャンネル群で初期化
    pub fn new(channels: impl IntoIterator<Item = ChannelState>) -> Self {
        let channels = channels
            .into_iter()
            .map(|state| (state.id.clone(), state))
            .collect();
        Self {
            channels: Mutex::new(channels),
        }
    }

    /// 既定の動画チャンネル（channel_1、再生中）のみを持つストア
    pub fn with_default_channel() -> Self {
        Self::new([ChannelState::default()])
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn get(&self, channel_id: &ChannelId) -> Result<ChannelState, RepositoryError> {
        let channels = self.channels.lock().await;
        channels
            .get(channel_id)
            .cloned()
            .ok_or_else(|| RepositoryError::ChannelNotFound(channel_id.as_str().to_string()))
    }

    async fn set_status(
        &self,
        channel_id: &ChannelId,
        status: PlaybackStatus,
    ) -> Result<ChannelState, RepositoryError> {
        let mut channels = self.channels.lock().await;
        let state = channels
            .get_mut(channel_id)
            .ok_or_else(|| RepositoryError::ChannelNotFound(channel_id.as_str().to_string()))?;
        state.set_status(status);
        Ok(state.clone())
    }

    async fn synchronized_channels(&self) -> Vec<ChannelState> {
        let channels = self.channels.lock().await;
        channels
            .values()
            .filter(|state| state.is_synchronized())
            .cloned()
            .collect()
    }
}
