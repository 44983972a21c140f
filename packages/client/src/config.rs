//! Client configuration.

use std::time::Duration;

use clap::Parser;

use crate::error::ClientError;

pub const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_SEEK_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_MEDIA_LENGTH_SECS: f64 = 596.0;

/// Command-line arguments of the `tandem-client` binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "tandem-client")]
#[command(about = "Interactive playback client that stays in sync with a Tandem server", long_about = None)]
pub struct ClientArgs {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Delay before each reconnection attempt (milliseconds)
    #[arg(long, default_value_t = DEFAULT_RECONNECT_DELAY_MS)]
    pub reconnect_delay_ms: u64,

    /// Give up after this many consecutive reconnection attempts (unlimited if omitted)
    #[arg(long)]
    pub max_reconnect_attempts: Option<u32>,

    /// Delay between releasing a seek and resuming sync (milliseconds)
    #[arg(long, default_value_t = DEFAULT_SEEK_DEBOUNCE_MS)]
    pub seek_debounce_ms: u64,

    /// Length of the simulated media (seconds)
    #[arg(long, default_value_t = DEFAULT_MEDIA_LENGTH_SECS)]
    pub duration: f64,
}

/// Reconnection policy: fixed delay, optional cap on consecutive attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            max_attempts: None,
        }
    }
}

/// Validated client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub url: String,
    pub reconnect: ReconnectPolicy,
    pub seek_debounce: Duration,
    pub media_length: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            seek_debounce: Duration::from_millis(DEFAULT_SEEK_DEBOUNCE_MS),
            media_length: DEFAULT_MEDIA_LENGTH_SECS,
        }
    }
}

impl TryFrom<ClientArgs> for ClientConfig {
    type Error = ClientError;

    fn try_from(args: ClientArgs) -> Result<Self, Self::Error> {
        if !(args.url.starts_with("ws://") || args.url.starts_with("wss://")) {
            return Err(ClientError::InvalidUrl(args.url));
        }

        Ok(Self {
            url: args.url,
            reconnect: ReconnectPolicy {
                delay: Duration::from_millis(args.reconnect_delay_ms),
                max_attempts: args.max_reconnect_attempts,
            },
            seek_debounce: Duration::from_millis(args.seek_debounce_ms),
            media_length: if args.duration.is_finite() && args.duration > 0.0 {
                args.duration
            } else {
                DEFAULT_MEDIA_LENGTH_SECS
            },
        })
    }
}
