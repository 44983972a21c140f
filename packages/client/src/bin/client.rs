//! Interactive playback client with reconnection support.
//!
//! Connects to a Tandem server, mirrors the shared play/pause state on a
//! simulated player and sends play/pause commands for local gestures.
//! Automatically reconnects on disconnection (fixed delay, unlimited by
//! default).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tandem-client
//! cargo run --bin tandem-client -- --url ws://127.0.0.1:3000/ws --max-reconnect-attempts 5
//! ```

use clap::Parser;

use tandem_client::config::{ClientArgs, ClientConfig};
use tandem_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = ClientArgs::parse();
    let config = match ClientConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Run the client
    if let Err(e) = tandem_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }

    // The readline thread may still be blocked on stdin
    std::process::exit(0);
}
