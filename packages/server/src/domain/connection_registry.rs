//! Connection Registry trait 定義
//!
//! 接続中のクライアントへのメッセージ送信（通知）のインターフェース。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, RegistryError};

/// 接続ごとの送信キュー
///
/// 受信側（pusher loop）が終了すると closed になり、その接続は open ではないとみなす。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Connection Registry
///
/// 登録は接続受付時、削除はトランスポートの close / error 通知時のみ行う。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を削除（未登録でもエラーにしない）
    async fn unregister(&self, connection_id: &ConnectionId);

    /// 特定の接続にメッセージを送信
    async fn push_to(&self, connection_id: &ConnectionId, content: &str)
    -> Result<(), RegistryError>;

    /// open な接続のうち `excluded` 以外の ID を取得（`None` なら除外なし）
    async fn open_connections_except(&self, excluded: Option<ConnectionId>) -> Vec<ConnectionId>;

    /// 複数の接続にメッセージを送信し、配送できた数を返す
    ///
    /// 個別の送信失敗はスキップし、他の接続への配送は継続する。
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> usize;

    /// open な接続数
    async fn count_open(&self) -> usize;
}
