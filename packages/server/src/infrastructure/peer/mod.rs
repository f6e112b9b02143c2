//! Peer implementations.

pub mod tcp;

pub use tcp::TcpPeer;
