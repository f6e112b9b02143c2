//! Server configuration

use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

/// Default size of each connection's receive buffer
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum bytes read (and relayed) per receive
    pub buffer_size: usize,

    /// Disconnect a client that sends nothing for this long (`None` = wait forever)
    pub read_timeout: Option<Duration>,

    /// Enable TCP_NODELAY on accepted connections
    pub tcp_nodelay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_timeout: None,
            tcp_nodelay: true,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Set the receive buffer size (at least one byte)
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Set the read timeout
    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn with_tcp_nodelay(mut self, tcp_nodelay: bool) -> Self {
        self.tcp_nodelay = tcp_nodelay;
        self
    }
}
