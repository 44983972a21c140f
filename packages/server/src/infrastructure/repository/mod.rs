//! Channel store implementations.

pub mod inmemory;

pub use inmemory::InMemoryChannelRepository;
