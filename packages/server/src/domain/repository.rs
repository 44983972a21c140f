//! Repository trait 定義
//!
//! ドメイン層が必要とするチャンネル状態ストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChannelId, ChannelState, PlaybackStatus, RepositoryError};

/// Channel State Store
///
/// チャンネルごとの正規状態を保持する。
/// どのコマンドを受け付けるかの判断は呼び出し側（UseCase 層）が行う。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// チャンネル状態を取得
    async fn get(&self, channel_id: &ChannelId) -> Result<ChannelState, RepositoryError>;

    /// ステータスを更新し、更新後の正規状態を返す
    async fn set_status(
        &self,
        channel_id: &ChannelId,
        status: PlaybackStatus,
    ) -> Result<ChannelState, RepositoryError>;

    /// 同期対象の全チャンネル状態を ID 順で取得
    async fn synchronized_channels(&self) -> Vec<ChannelState>;
}
