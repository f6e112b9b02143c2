//! Peer trait
//!
//! A registered connection as seen by the broadcaster: something with an
//! identity that payload bytes can be written to.

use async_trait::async_trait;

use super::{ConnectionId, Endpoint, SendError};

/// Write side of one connected client.
///
/// Implementations must serialize concurrent `send` calls so that two payloads
/// written to the same peer never interleave on the wire.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Peer: Send + Sync {
    /// Registry identity
    fn id(&self) -> ConnectionId;

    /// Remote endpoint
    fn endpoint(&self) -> Endpoint;

    /// Unix timestamp (milliseconds) at which the connection was accepted
    fn connected_at(&self) -> i64;

    /// Write the whole payload, returning once it has been handed to the OS.
    async fn send(&self, payload: &[u8]) -> Result<(), SendError>;

    /// Close the write side. Later `send` calls fail with `SendError::Closed`.
    async fn close(&self);
}
