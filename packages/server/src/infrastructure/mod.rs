//! Infrastructure layer: concrete stores, the socket-backed registry and wire DTOs.

pub mod connection_registry;
pub mod dto;
pub mod repository;
