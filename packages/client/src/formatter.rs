//! Message formatting utilities for client display.

use chrono::{DateTime, Local};
use serde_json::Value;

use tandem_server::{domain::PlaybackStatus, infrastructure::dto::websocket::ChannelStateDto};

use crate::reconciler::SyncPhase;

/// Snapshot of what the client shows in its status line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusView {
    pub connected: bool,
    pub status: PlaybackStatus,
    pub phase: SyncPhase,
    pub position: f64,
    pub duration: Option<f64>,
    pub progress: f64,
}

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a channel state pushed by the server
    pub fn format_channel_state(state: &ChannelStateDto) -> String {
        format!(
            "\n{} server: {} ({})\n",
            Self::status_icon(state.metadata.video_status),
            state.metadata.video_status,
            state.metadata.video_url
        )
    }

    /// Format the local status line
    pub fn format_status(view: &StatusView) -> String {
        let connection = if view.connected {
            "connected"
        } else {
            "disconnected"
        };
        let duration = view
            .duration
            .map(Self::format_clock)
            .unwrap_or_else(|| "--:--".to_string());
        let seeking = match view.phase {
            SyncPhase::Seeking { dragging: true, .. } => " [dragging]",
            SyncPhase::Seeking { .. } => " [seeking]",
            _ => "",
        };

        format!(
            "\n[{}] {} {} {} / {} ({:.0}%){}\n",
            connection,
            Self::status_icon(view.status),
            view.status,
            Self::format_clock(view.position),
            duration,
            view.progress,
            seeking
        )
    }

    /// Format a payload relayed from another client
    ///
    /// The relay timestamp is shown in local time when it parses.
    pub fn format_relay(data: &Value, timestamp: &str) -> String {
        let received_at = DateTime::parse_from_rfc3339(timestamp)
            .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| timestamp.to_string());
        format!("\n← [{}] {}\n", received_at, data)
    }

    /// Format an error envelope from the server
    pub fn format_server_error(message: &str) -> String {
        format!("\n! Server error: {}\n", message)
    }

    /// Format a raw text message (when it is not a known frame)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format a connection-status change
    pub fn format_connection(connected: bool, url: &str) -> String {
        if connected {
            format!("\n* Connected to {}\n", url)
        } else {
            format!("\n* Disconnected from {}\n", url)
        }
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  play | pause | t(oggle)   control playback",
            "  ff | rw                   skip 10 seconds forward / back",
            "  seek <0-100>              move the progress control",
            "  drag / move <0-100> / release",
            "                            drag the progress control",
            "  click <0-100>             click the progress track",
            "  say <json|text>           send a payload to the other clients",
            "  status | help | quit",
            "",
        ]
        .join("\n")
    }

    /// Format seconds as `mm:ss`
    pub fn format_clock(seconds: f64) -> String {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    fn status_icon(status: PlaybackStatus) -> &'static str {
        match status {
            PlaybackStatus::Playing => "▶",
            PlaybackStatus::Paused => "⏸",
        }
    }
}
