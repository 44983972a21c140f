//! UseCase: 汎用リレー処理
//!
//! コマンドとして解釈されないペイロードを、送信者以外の全接続へそのまま中継する。
//! スキーマは持たず、ベストエフォートで配送する。

use std::sync::Arc;

use serde_json::Value;
use tandem_shared::time::Clock;

use crate::{
    domain::{ConnectionId, ConnectionRegistry},
    infrastructure::dto::websocket::RelayEnvelope,
};

use super::error::RelayError;

/// 汎用リレーのユースケース
pub struct RelayMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl RelayMessageUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// `data` をエンベロープに包み、送信者以外に配送した数を返す
    pub async fn execute(&self, from: ConnectionId, data: Value) -> Result<usize, RelayError> {
        let envelope = RelayEnvelope::new(data, self.clock.now_iso8601());
        let json =
            serde_json::to_string(&envelope).map_err(|e| RelayError::Encode(e.to_string()))?;

        let targets = self.registry.open_connections_except(Some(from)).await;
        Ok(self.registry.broadcast(targets, &json).await)
    }
}
