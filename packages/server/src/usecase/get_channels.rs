//! UseCase: 正規状態の参照（デバッグ用）

use std::sync::Arc;

use crate::domain::{ChannelRepository, ChannelState};

/// 同期対象チャンネルの正規状態を取得するユースケース
pub struct GetChannelsUseCase {
    repository: Arc<dyn ChannelRepository>,
}

impl GetChannelsUseCase {
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<ChannelState> {
        self.repository.synchronized_channels().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, MockChannelRepository, PlaybackStatus};

    #[tokio::test]
    async fn test_get_channels_returns_store_contents() {
        // テスト項目: ストアが保持する同期対象チャンネルがそのまま返される
        // given (前提条件):
        let mut paused = ChannelState::default();
        paused.set_status(PlaybackStatus::Paused);
        let expected = vec![paused.clone()];
        let mut repository = MockChannelRepository::new();
        repository
            .expect_synchronized_channels()
            .times(1)
            .returning(move || vec![paused.clone()]);
        let usecase = GetChannelsUseCase::new(Arc::new(repository));

        // when (操作):
        let channels = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(channels, expected);
        assert_eq!(channels[0].id, ChannelId::primary());
    }
}
