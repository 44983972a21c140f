//! Utilities shared by the Tandem server and client binaries.

pub mod logger;
pub mod time;
