//! UseCase: 受信メッセージの振り分け
//!
//! ### 何をテストしているか
//! - HandleMessageUseCase::execute() メソッド
//! - 受信テキストをコマンド適用 / 無視 / リレー / エラー応答に振り分ける
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効な play / pause コマンド、任意ペイロードのリレー
//! - 異常系：JSON として解釈できないテキスト（送信者にのみエラー応答）
//! - エッジケース：未知のチャンネル・未知のコマンド（何もしない）

use std::sync::Arc;

use serde_json::Value;

use crate::{
    domain::{ChannelId, ChannelState, ConnectionId, ConnectionRegistry, PlaybackStatus},
    infrastructure::dto::websocket::{ErrorEnvelope, InboundMessage},
};

use super::{
    apply_command::ApplyCommandUseCase, error::ApplyCommandError,
    relay_message::RelayMessageUseCase,
};

/// コマンドを無視した理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// channel が文字列でない、または同期対象のチャンネルでない
    UnknownChannel(String),
    /// command が play / pause ではない
    UnknownCommand(String),
    /// 適用中に失敗した
    NotApplied(String),
}

/// 受信メッセージの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// コマンドを適用し、全接続にブロードキャストした
    Applied { state: ChannelState, delivered: usize },
    /// 不正なコマンドを黙って無視した
    Ignored(IgnoreReason),
    /// 送信者以外にリレーした
    Relayed { delivered: usize },
    /// デコードできず、送信者にエラーを返した
    Rejected,
}

/// 受信メッセージ振り分けのユースケース
pub struct HandleMessageUseCase {
    apply_command: Arc<ApplyCommandUseCase>,
    relay_message: Arc<RelayMessageUseCase>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl HandleMessageUseCase {
    pub fn new(
        apply_command: Arc<ApplyCommandUseCase>,
        relay_message: Arc<RelayMessageUseCase>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            apply_command,
            relay_message,
            registry,
        }
    }

    /// 1 件の受信テキストを最後まで処理する
    pub async fn execute(&self, from: ConnectionId, text: &str) -> MessageOutcome {
        let inbound = match InboundMessage::parse(text) {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!("Invalid message from '{}': {}", from, e);
                self.reject(from).await;
                return MessageOutcome::Rejected;
            }
        };

        match inbound {
            InboundMessage::Command { channel, command } => {
                self.apply(from, &channel, &command).await
            }
            InboundMessage::Relay(data) => match self.relay_message.execute(from, data).await {
                Ok(delivered) => MessageOutcome::Relayed { delivered },
                Err(e) => {
                    tracing::warn!("Failed to relay message from '{}': {}", from, e);
                    MessageOutcome::Relayed { delivered: 0 }
                }
            },
        }
    }

    /// バイナリフレームを UTF-8 テキストとして処理する（不正な UTF-8 はデコード失敗扱い）
    pub async fn execute_binary(&self, from: ConnectionId, data: &[u8]) -> MessageOutcome {
        match std::str::from_utf8(data) {
            Ok(text) => self.execute(from, text).await,
            Err(e) => {
                tracing::warn!("Invalid UTF-8 frame from '{}': {}", from, e);
                self.reject(from).await;
                MessageOutcome::Rejected
            }
        }
    }

    async fn apply(&self, from: ConnectionId, channel: &Value, command: &Value) -> MessageOutcome {
        let Some(channel_id) = channel
            .as_str()
            .and_then(|s| ChannelId::new(s.to_string()).ok())
        else {
            return MessageOutcome::Ignored(IgnoreReason::UnknownChannel(channel.to_string()));
        };
        let Some(status) = command
            .as_str()
            .and_then(|s| PlaybackStatus::from_command(s).ok())
        else {
            return MessageOutcome::Ignored(IgnoreReason::UnknownCommand(command.to_string()));
        };

        match self.apply_command.execute(&channel_id, status).await {
            Ok(applied) => {
                tracing::info!(
                    "{}: video {} (from '{}', delivered to {})",
                    channel_id,
                    status.as_command(),
                    from,
                    applied.delivered
                );
                MessageOutcome::Applied {
                    state: applied.state,
                    delivered: applied.delivered,
                }
            }
            Err(e @ ApplyCommandError::Encode(_)) => {
                tracing::error!("Failed to apply command to '{}': {}", channel_id, e);
                MessageOutcome::Ignored(IgnoreReason::NotApplied(e.to_string()))
            }
            Err(e) => {
                tracing::debug!("Ignoring command from '{}': {}", from, e);
                MessageOutcome::Ignored(IgnoreReason::UnknownChannel(channel_id.into_string()))
            }
        }
    }

    async fn reject(&self, from: ConnectionId) {
        let json = match serde_json::to_string(&ErrorEnvelope::invalid_format()) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode error envelope: {}", e);
                return;
            }
        };
        if let Err(e) = self.registry.push_to(&from, &json).await {
            tracing::warn!("Failed to send error to '{}': {}", from, e);
        }
    }
}
