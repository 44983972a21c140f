//! WebSocket を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - WebSocket 接続ごとの `UnboundedSender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はキューへの投入のみで完了するため、遅い受信者が他の接続への配送を止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRegistry, PusherChannel, RegistryError, select_broadcast_targets,
};

/// WebSocket を使った ConnectionRegistry 実装
pub struct WebSocketConnectionRegistry {
    /// 接続中のクライアントの WebSocket sender
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketConnectionRegistry {
    /// 新しい WebSocketConnectionRegistry を作成
    pub fn new(connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { connections }
    }
}

impl Default for WebSocketConnectionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        if connections.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), RegistryError> {
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| RegistryError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn open_connections_except(&self, excluded: Option<ConnectionId>) -> Vec<ConnectionId> {
        let connections = self.connections.lock().await;
        select_broadcast_targets(
            connections
                .iter()
                .map(|(id, sender)| (*id, !sender.is_closed())),
            excluded,
        )
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> usize {
        let connections = self.connections.lock().await;
        let mut delivered = 0;

        for target in targets {
            let Some(sender) = connections.get(&target) else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                continue;
            };
            if sender.is_closed() {
                tracing::debug!("Connection '{}' is not open, skipping", target);
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to push message to connection '{}': {}", target, e),
            }
        }

        delivered
    }

    async fn count_open(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.values().filter(|sender| !sender.is_closed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続への送信（閉じた接続のスキップ）
    // - open_connections_except: 除外指定付きのターゲット取得
    //
    // 【なぜこのテストが必要か】
    // - 1 つの接続の送信失敗が他の接続への配送を止めないことを保証する
    // ========================================

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        registry.register(id, tx).await;

        // when (操作):
        let result = registry.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let id = ConnectionId::generate();

        // when (操作):
        let result = registry.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_to_closed_connection() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed を返す
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        registry.register(id, tx).await;
        drop(rx);

        // when (操作):
        let result = registry.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connections() {
        // テスト項目: 閉じた接続はスキップされ、他の接続には配送される
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        let (a, b, c) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        registry.register(a, tx1).await;
        registry.register(b, tx2).await;
        registry.register(c, tx3).await;
        drop(rx2);

        // when (操作):
        let delivered = registry.broadcast(vec![a, b, c], "state").await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await, Some("state".to_string()));
        assert_eq!(rx3.recv().await, Some("state".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_unknown_target_is_skipped() {
        // テスト項目: 未登録のターゲットが含まれていても配送は継続される
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let a = ConnectionId::generate();
        registry.register(a, tx).await;

        // when (操作):
        let delivered = registry
            .broadcast(vec![ConnectionId::generate(), a], "state")
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(rx.recv().await, Some("state".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();

        // when (操作):
        let delivered = registry.broadcast(vec![], "state").await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_open_connections_except() {
        // テスト項目: 除外指定した接続と閉じた接続を除いた ID が返される
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let (tx3, rx3) = mpsc::unbounded_channel();
        let (a, b, c) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        registry.register(a, tx1).await;
        registry.register(b, tx2).await;
        registry.register(c, tx3).await;
        drop(rx3);

        // when (操作):
        let all_open = registry.open_connections_except(None).await;
        let except_a = registry.open_connections_except(Some(a)).await;

        // then (期待する結果):
        assert_eq!(all_open.len(), 2);
        assert!(all_open.contains(&a) && all_open.contains(&b));
        assert_eq!(except_a, vec![b]);
        assert_eq!(registry.count_open().await, 2);
    }

    #[tokio::test]
    async fn test_unregister_removes_connection() {
        // テスト項目: 削除した接続は数に含まれず、再削除してもエラーにならない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        registry.register(id, tx).await;

        // when (操作):
        registry.unregister(&id).await;
        registry.unregister(&id).await;

        // then (期待する結果):
        assert_eq!(registry.count_open().await, 0);
        assert!(registry.open_connections_except(None).await.is_empty());
    }
}
