//! UseCase: クライアント切断処理
//!
//! 切断は通知しない（退出メッセージはプロトコルに存在しない）。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectClientUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続を削除し、残りの open な接続数を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> usize {
        self.registry.unregister(connection_id).await;
        self.registry.count_open().await
    }
}
