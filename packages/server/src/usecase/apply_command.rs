//! UseCase: 再生コマンド適用処理
//!
//! ### 何をテストしているか
//! - ApplyCommandUseCase::execute() メソッド
//! - 正規状態の更新と、送信者を含む全接続へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身も確定した状態を受け取り、楽観的な UI 遷移を確認できる
//! - 1 コマンドにつき各接続へちょうど 1 件のペイロードが配送されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：play / pause の適用
//! - 異常系：存在しないチャンネル

use std::sync::Arc;

use crate::{
    domain::{
        ChannelId, ChannelRepository, ChannelState, ConnectionRegistry, PlaybackStatus,
        RepositoryError,
    },
    infrastructure::dto::conversion::to_channel_payload,
};

use super::error::ApplyCommandError;

/// コマンド適用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandApplied {
    /// 更新後の正規状態
    pub state: ChannelState,
    /// ペイロードを配送できた接続数
    pub delivered: usize,
}

/// 再生コマンド適用のユースケース
pub struct ApplyCommandUseCase {
    repository: Arc<dyn ChannelRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl ApplyCommandUseCase {
    /// 新しい ApplyCommandUseCase を作成
    pub fn new(
        repository: Arc<dyn ChannelRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// ステータスを適用し、新しいチャンネルペイロードを全接続にブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `channel_id` - 対象チャンネル
    /// * `status` - 要求されたステータス
    ///
    /// # Returns
    ///
    /// * `Ok(CommandApplied)` - 更新後の状態と配送数
    /// * `Err(ApplyCommandError)` - 同期対象のチャンネルではない
    pub async fn execute(
        &self,
        channel_id: &ChannelId,
        status: PlaybackStatus,
    ) -> Result<CommandApplied, ApplyCommandError> {
        // 1. 同期対象のチャンネルか確認
        let current = self.repository.get(channel_id).await.map_err(not_found)?;
        if !current.is_synchronized() {
            return Err(ApplyCommandError::NotSynchronized(
                channel_id.as_str().to_string(),
            ));
        }

        // 2. 正規状態を更新
        let state = self
            .repository
            .set_status(channel_id, status)
            .await
            .map_err(not_found)?;

        // 3. 送信者を含む全ての open な接続にブロードキャスト
        let payload = serde_json::to_string(&to_channel_payload([state.clone()]))
            .map_err(|e| ApplyCommandError::Encode(e.to_string()))?;
        let targets = self.registry.open_connections_except(None).await;
        let delivered = self.registry.broadcast(targets, &payload).await;

        Ok(CommandApplied { state, delivered })
    }
}

fn not_found(error: RepositoryError) -> ApplyCommandError {
    match error {
        RepositoryError::ChannelNotFound(id) => ApplyCommandError::ChannelNotFound(id),
    }
}
