//! UseCase: クライアント接続処理
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録と、現在の正規状態スナップショットの送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続がスナップショットを 1 件だけ受け取る
//! - 異常系：スナップショット送信前に接続が閉じていた場合
//! - エッジケース：他の接続には何も送信されない

use std::sync::Arc;

use crate::{
    domain::{ChannelRepository, ConnectionId, ConnectionRegistry, PusherChannel},
    infrastructure::dto::conversion::to_channel_payload,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Channel State Store
    repository: Arc<dyn ChannelRepository>,
    /// Connection Registry
    registry: Arc<dyn ConnectionRegistry>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn ChannelRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// 接続を登録し、同期対象チャンネルのスナップショットを送信
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 新規接続の ID
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録とスナップショット送信に成功
    /// * `Err(ConnectError)` - スナップショットを送信できなかった（登録は残る）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        // 1. Registry に接続を登録
        self.registry.register(connection_id, sender).await;

        // 2. 現在の正規状態からスナップショットを構築
        let payload = to_channel_payload(self.repository.synchronized_channels().await);
        let snapshot =
            serde_json::to_string(&payload).map_err(|e| ConnectError::Encode(e.to_string()))?;

        // 3. 新規接続にのみ送信
        self.registry
            .push_to(&connection_id, &snapshot)
            .await
            .map_err(|e| ConnectError::SnapshotFailed(e.to_string()))
    }
}
