//! UseCase layer: one struct per server operation.

mod apply_command;
mod connect_client;
mod disconnect_client;
mod error;
mod get_channels;
mod get_health;
mod handle_message;
mod relay_message;

pub use apply_command::{ApplyCommandUseCase, CommandApplied};
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ApplyCommandError, ConnectError, RelayError};
pub use get_channels::GetChannelsUseCase;
pub use get_health::{GetHealthUseCase, HealthReport};
pub use handle_message::{HandleMessageUseCase, IgnoreReason, MessageOutcome};
pub use relay_message::RelayMessageUseCase;
