//! Source of accepted client connections for the accept loop.

use std::{io, net::SocketAddr};

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpStream};

/// Accepts incoming TCP connections
///
/// [`super::Server::bind`] uses a bound [`TcpListener`]. Other implementations
/// can be handed to [`super::Server::with_listener`].
#[async_trait]
pub trait Listener: Send + Sync {
    /// Wait for the next connection. Must be cancel safe.
    async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)>;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

#[async_trait]
impl Listener for TcpListener {
    async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}
