//! Domain layer: value objects, entities and the interfaces the use cases depend on.

pub mod connection_registry;
pub mod entity;
pub mod error;
pub mod repository;
pub mod targets;
pub mod value_object;

pub use connection_registry::{ConnectionRegistry, PusherChannel};
pub use entity::{ChannelMetadata, ChannelState};
pub use error::{RegistryError, RepositoryError, ValueObjectError};
pub use repository::ChannelRepository;
pub use targets::select_broadcast_targets;
pub use value_object::{ChannelId, ChannelKind, ConnectionId, PlaybackStatus, SourceUrl};

#[cfg(test)]
pub use connection_registry::MockConnectionRegistry;
#[cfg(test)]
pub use repository::MockChannelRepository;
