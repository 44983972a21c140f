//! UseCase: ヘルスチェック

use std::sync::Arc;

use tandem_shared::time::Clock;

use crate::domain::ConnectionRegistry;

/// ヘルスチェック結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// open な接続数
    pub clients: usize,
    /// ISO 8601 (UTC)
    pub timestamp: String,
}

/// ヘルスチェックのユースケース
pub struct GetHealthUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl GetHealthUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    pub async fn execute(&self) -> HealthReport {
        HealthReport {
            clients: self.registry.count_open().await,
            timestamp: self.clock.now_iso8601(),
        }
    }
}
