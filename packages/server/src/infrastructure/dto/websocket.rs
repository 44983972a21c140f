//! WebSocket message DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChannelKind, PlaybackStatus};

/// Text of the error envelope sent back for undecodable frames.
pub const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";

/// Channel payload keyed by channel ID, e.g. `{"channel_1": {...}}`.
///
/// Sent as the snapshot on connect and after every applied command.
pub type ChannelPayload = BTreeMap<String, ChannelStateDto>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStateDto {
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub metadata: ChannelMetadataDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadataDto {
    pub video_url: String,
    pub video_status: PlaybackStatus,
}

/// Envelope type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeType {
    Broadcast,
    Error,
}

/// Generic relay of a non-command payload to the other clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayEnvelope {
    pub r#type: EnvelopeType,
    pub data: Value,
    pub timestamp: String,
}

impl RelayEnvelope {
    pub fn new(data: Value, timestamp: String) -> Self {
        Self {
            r#type: EnvelopeType::Broadcast,
            data,
            timestamp,
        }
    }
}

/// Error reply, sent to the offending connection only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub r#type: EnvelopeType,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn invalid_format() -> Self {
        Self {
            r#type: EnvelopeType::Error,
            message: INVALID_MESSAGE_FORMAT.to_string(),
        }
    }
}

/// Client → server play/pause intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCommandDto {
    pub channel: String,
    pub command: String,
}

impl ClientCommandDto {
    /// Command requesting `status` on `channel`.
    pub fn request(channel: impl Into<String>, status: PlaybackStatus) -> Self {
        Self {
            channel: channel.into(),
            command: status.as_command().to_string(),
        }
    }
}

/// Why an inbound frame could not be decoded
#[derive(Debug, Error)]
pub enum InboundDecodeError {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `null` has no members to inspect
    #[error("payload is null")]
    Null,
}

/// Decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Object carrying both `channel` and `command`; not yet validated
    Command { channel: Value, command: Value },
    /// Anything else that decodes; relayed verbatim
    Relay(Value),
}

impl InboundMessage {
    /// Decode a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is not valid JSON or decodes to `null`.
    pub fn parse(text: &str) -> Result<Self, InboundDecodeError> {
        let value: Value = serde_json::from_str(text)?;
        if value.is_null() {
            return Err(InboundDecodeError::Null);
        }
        Ok(Self::classify(value))
    }

    /// A value is a command when it is an object whose `channel` and `command`
    /// members are both truthy. Everything else goes down the relay path.
    pub fn classify(value: Value) -> Self {
        if let Value::Object(map) = &value
            && let (Some(channel), Some(command)) = (map.get("channel"), map.get("command"))
            && is_truthy(channel)
            && is_truthy(command)
        {
            return InboundMessage::Command {
                channel: channel.clone(),
                command: command.clone(),
            };
        }
        InboundMessage::Relay(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_payload_wire_shape() {
        // テスト項目: チャンネルペイロードがワイヤ形式でシリアライズされる
        // given (前提条件):
        let mut payload = ChannelPayload::new();
        payload.insert(
            "channel_1".to_string(),
            ChannelStateDto {
                kind: ChannelKind::Video,
                metadata: ChannelMetadataDto {
                    video_url: "https://example.com/v.mp4".to_string(),
                    video_status: PlaybackStatus::Paused,
                },
            },
        );

        // when (操作):
        let value = serde_json::to_value(&payload).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "channel_1": {
                    "type": "video",
                    "metadata": {
                        "video_url": "https://example.com/v.mp4",
                        "video_status": "paused"
                    }
                }
            })
        );
    }

    #[test]
    fn test_error_envelope_wire_shape() {
        // テスト項目: エラーエンベロープがワイヤ形式でシリアライズされる
        // given (前提条件):
        let envelope = ErrorEnvelope::invalid_format();

        // when (操作):
        let value = serde_json::to_value(&envelope).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "error", "message": "Invalid message format"})
        );
    }

    #[test]
    fn test_relay_envelope_wire_shape() {
        // テスト項目: リレーエンベロープが元のペイロードとタイムスタンプを含む
        // given (前提条件):
        let envelope = RelayEnvelope::new(json!({"foo": "bar"}), "2023-01-01T00:00:00.000Z".to_string());

        // when (操作):
        let value = serde_json::to_value(&envelope).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "broadcast",
                "data": {"foo": "bar"},
                "timestamp": "2023-01-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn test_client_command_request() {
        // テスト項目: ステータスから対応するコマンドが作成される
        // given (前提条件):

        // when (操作):
        let command = ClientCommandDto::request("channel_1", PlaybackStatus::Paused);

        // then (期待する結果):
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({"channel": "channel_1", "command": "pause"})
        );
    }

    #[test]
    fn test_parse_command() {
        // テスト項目: channel と command を持つオブジェクトはコマンドとして分類される
        // given (前提条件):
        let text = r#"{"channel":"channel_1","command":"play"}"#;

        // when (操作):
        let result = InboundMessage::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            result,
            InboundMessage::Command {
                channel: json!("channel_1"),
                command: json!("play"),
            }
        );
    }

    #[test]
    fn test_parse_unknown_command_is_still_command() {
        // テスト項目: 未知のコマンドでも両フィールドがあればコマンド扱い（リレーしない）
        // given (前提条件):
        let text = r#"{"channel":"channel_7","command":"rewind"}"#;

        // when (操作):
        let result = InboundMessage::parse(text).unwrap();

        // then (期待する結果):
        assert!(matches!(result, InboundMessage::Command { .. }));
    }

    #[test]
    fn test_parse_non_command_object_is_relay() {
        // テスト項目: コマンドでないオブジェクトはリレーとして分類される
        // given (前提条件):
        let text = r#"{"foo":"bar"}"#;

        // when (操作):
        let result = InboundMessage::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(result, InboundMessage::Relay(json!({"foo": "bar"})));
    }

    #[test]
    fn test_parse_falsy_fields_are_relay() {
        // テスト項目: channel / command が空文字列や null の場合はリレーとして分類される
        // given (前提条件):
        let empty_channel = r#"{"channel":"","command":"play"}"#;
        let null_command = r#"{"channel":"channel_1","command":null}"#;
        let zero_command = r#"{"channel":"channel_1","command":0}"#;

        // when (操作):
        let results = [empty_channel, null_command, zero_command]
            .map(|text| InboundMessage::parse(text).unwrap());

        // then (期待する結果):
        for result in results {
            assert!(matches!(result, InboundMessage::Relay(_)));
        }
    }

    #[test]
    fn test_parse_scalar_is_relay() {
        // テスト項目: オブジェクト以外の JSON 値もリレーとして分類される
        // given (前提条件):
        let text = "42";

        // when (操作):
        let result = InboundMessage::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(result, InboundMessage::Relay(json!(42)));
    }

    #[test]
    fn test_parse_malformed() {
        // テスト項目: JSON として解釈できないテキストはエラーになる
        // given (前提条件):
        let text = "not json {";

        // when (操作):
        let result = InboundMessage::parse(text);

        // then (期待する結果):
        assert!(matches!(result, Err(InboundDecodeError::Json(_))));
    }

    #[test]
    fn test_parse_null_is_rejected() {
        // テスト項目: JSON の null はリレーせずデコードエラーになる
        // given (前提条件):
        let text = " null ";

        // when (操作):
        let result = InboundMessage::parse(text);

        // then (期待する結果):
        assert!(matches!(result, Err(InboundDecodeError::Null)));
    }
}
