//! Playback synchronization server library.
//!
//! Holds the canonical play/pause state of a shared video channel and relays
//! every change to all connected WebSocket clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod app;
pub mod config;
