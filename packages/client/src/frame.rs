//! Decoding of server → client frames.

use serde_json::Value;

use tandem_server::{
    domain::value_object::PRIMARY_CHANNEL_ID,
    infrastructure::dto::websocket::ChannelStateDto,
};

/// A decoded server frame
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    /// Snapshot or update of the synchronized video channel
    ChannelState(ChannelStateDto),
    /// Payload relayed from another client
    Relay { data: Value, timestamp: String },
    /// Error envelope addressed to this client
    Error(String),
    /// Valid JSON the client has no use for
    Other(Value),
}

/// Decode a text frame.
///
/// A frame carrying a well-formed `channel_1` entry is channel state; the
/// `type` tag identifies relay and error envelopes.
///
/// # Errors
///
/// Returns the JSON error when `text` is not valid JSON.
pub fn parse_server_frame(text: &str) -> Result<ServerFrame, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;

    if let Some(channel) = value.get(PRIMARY_CHANNEL_ID) {
        return Ok(match serde_json::from_value::<ChannelStateDto>(channel.clone()) {
            Ok(state) => ServerFrame::ChannelState(state),
            Err(e) => {
                tracing::warn!("Ignoring malformed channel payload: {}", e);
                ServerFrame::Other(value)
            }
        });
    }

    match value.get("type").and_then(Value::as_str) {
        Some("broadcast") => Ok(ServerFrame::Relay {
            data: value.get("data").cloned().unwrap_or(Value::Null),
            timestamp: value
                .get("timestamp")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        Some("error") => Ok(ServerFrame::Error(
            value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )),
        _ => Ok(ServerFrame::Other(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tandem_server::domain::PlaybackStatus;

    #[test]
    fn test_parse_channel_state() {
        // テスト項目: channel_1 を含むフレームはチャンネル状態として解釈される
        // given (前提条件):
        let text = r#"{"channel_1":{"type":"video","metadata":{"video_url":"https://example.com/v.mp4","video_status":"paused"}}}"#;

        // when (操作):
        let frame = parse_server_frame(text).unwrap();

        // then (期待する結果):
        match frame {
            ServerFrame::ChannelState(state) => {
                assert_eq!(state.metadata.video_status, PlaybackStatus::Paused);
                assert_eq!(state.metadata.video_url, "https://example.com/v.mp4");
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_parse_relay_envelope() {
        // テスト項目: broadcast 封筒はリレーとして data とタイムスタンプを取り出す
        // given (前提条件):
        let text = r#"{"type":"broadcast","data":{"foo":"bar"},"timestamp":"2023-01-01T00:00:00.000Z"}"#;

        // when (操作):
        let frame = parse_server_frame(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            ServerFrame::Relay {
                data: json!({"foo": "bar"}),
                timestamp: "2023-01-01T00:00:00.000Z".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_error_envelope() {
        // テスト項目: error 封筒はメッセージを取り出す
        // given (前提条件):
        let text = r#"{"type":"error","message":"Invalid message format"}"#;

        // when (操作):
        let frame = parse_server_frame(text).unwrap();

        // then (期待する結果):
        assert_eq!(frame, ServerFrame::Error("Invalid message format".to_string()));
    }

    #[test]
    fn test_parse_malformed_channel_payload_is_other() {
        // テスト項目: channel_1 の中身が不正な場合は状態として扱わない
        // given (前提条件):
        let text = r#"{"channel_1":{"type":"video","metadata":{"video_status":"rewinding"}}}"#;

        // when (操作):
        let frame = parse_server_frame(text).unwrap();

        // then (期待する結果):
        assert!(matches!(frame, ServerFrame::Other(_)));
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        // テスト項目: JSON でないフレームはエラーになる
        // given (前提条件):
        let text = "not json";

        // when (操作):
        let result = parse_server_frame(text);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
