//! Tandem playback client.
//!
//! Keeps a local media element in step with the shared play/pause state held
//! by a Tandem server, without echoing server-driven changes back.

pub mod config;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod frame;
pub mod input;
pub mod media;
pub mod player;
pub mod reconciler;
pub mod runner;
pub mod session;
pub mod ui;

pub use error::{ClientError, MediaError};
pub use media::{MediaElement, MediaEvent};
pub use player::SimulatedPlayer;
pub use reconciler::{ClickTarget, Effects, Reconciler, SeekRelease, SyncPhase};
pub use runner::run_client;
