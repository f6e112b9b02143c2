//! Domain layer
//!
//! Connection identity, the peer and registry abstractions the relay depends on,
//! and the pure text/notice logic. Concrete implementations live in the
//! infrastructure layer.

mod connection;
mod error;
mod notice;
mod peer;
mod registry;
mod text;

pub use connection::{ConnectionId, ConnectionIdFactory, DisconnectReason, Endpoint};
pub use error::{PortParseError, RelayError, SendError};
pub use notice::Notice;
pub use peer::Peer;
#[cfg(test)]
pub use peer::MockPeer;
pub use registry::ConnectionRegistry;
pub use text::Utf8ChunkDecoder;
