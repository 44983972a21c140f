//! Server configuration.

use clap::Parser;

use crate::domain::{SourceUrl, ValueObjectError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Command-line arguments of the `tandem-server` binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "tandem-server")]
#[command(about = "WebSocket server that keeps a shared video's play/pause state in sync", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port number for HTTP and WebSocket traffic
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Media resource the video channel starts with
    #[arg(long, default_value = SourceUrl::DEFAULT)]
    pub video_url: String,
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub video_url: SourceUrl,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            video_url: SourceUrl::default(),
        }
    }
}

impl TryFrom<ServerArgs> for ServerConfig {
    type Error = ValueObjectError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            host: args.host,
            port: args.port,
            video_url: SourceUrl::new(args.video_url)?,
        })
    }
}
