mod channel;

pub use channel::InMemoryChannelRepository;
