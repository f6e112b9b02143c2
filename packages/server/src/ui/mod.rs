//! TCP relay server implementation.

pub mod console;
mod handler;
pub mod listener;
mod server;
pub mod signal;
pub mod state;

pub use listener::Listener;
pub use server::Server;
