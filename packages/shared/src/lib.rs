//! Utilities shared by the Hiroba binaries: logging, time and host network helpers.

pub mod logger;
pub mod network;
pub mod time;
