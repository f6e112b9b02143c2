//! Connection identity value objects.

use std::{fmt, net::SocketAddr};

use uuid::Uuid;

/// Process-unique identity of one accepted connection.
///
/// The remote endpoint is not a reliable key (a client may reconnect from the
/// same address:port after a close), so the registry keys on this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates fresh connection ids
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4())
    }
}

/// Remote endpoint (address:port) of a connection, used for logs and notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint(SocketAddr);

impl Endpoint {
    pub fn addr(&self) -> SocketAddr {
        self.0
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a connection's receive loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client closed its side (zero-length read)
    Closed,
    /// Reading failed (reset, timeout, other I/O error)
    ReceiveFailed,
    /// The server is shutting down
    Shutdown,
}

impl DisconnectReason {
    /// Whether the remaining peers get a departure notice.
    ///
    /// Nobody is told about departures while the whole server goes down.
    pub fn notifies_peers(&self) -> bool {
        !matches!(self, DisconnectReason::Shutdown)
    }
}
