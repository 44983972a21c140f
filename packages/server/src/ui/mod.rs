//! WebSocket synchronization server: router, handlers and the event dispatcher.

mod dispatcher;
mod handler;
mod server;
mod signal;
pub mod state;

pub use dispatcher::{Dispatcher, InboundFrame, ServerEvent};
pub use server::Server;
