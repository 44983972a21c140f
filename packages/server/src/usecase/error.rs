//! UseCase 層のエラー型

use thiserror::Error;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// スナップショットのエンコードに失敗
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    /// スナップショットの送信に失敗
    #[error("Failed to send snapshot: {0}")]
    SnapshotFailed(String),
}

/// 再生コマンド適用のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyCommandError {
    /// チャンネルが存在しない
    #[error("Channel '{0}' not found")]
    ChannelNotFound(String),

    /// 同期対象ではないチャンネル
    #[error("Channel '{0}' is not synchronized")]
    NotSynchronized(String),

    /// ペイロードのエンコードに失敗
    #[error("Failed to encode channel payload: {0}")]
    Encode(String),
}

/// リレー処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// エンベロープのエンコードに失敗
    #[error("Failed to encode relay envelope: {0}")]
    Encode(String),
}
