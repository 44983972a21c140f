//! Playback synchronization server.
//!
//! Holds the shared play/pause state of one video channel and pushes every
//! change to all connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tandem-server
//! PORT=8080 cargo run --bin tandem-server -- --host 127.0.0.1
//! ```

use clap::Parser;

use tandem_server::{
    app::build_server,
    config::{ServerArgs, ServerConfig},
};
use tandem_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = ServerArgs::parse();
    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = build_server(&config);
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
