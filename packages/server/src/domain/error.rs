//! Error types for the relay.

use std::{io, net::SocketAddr, time::Duration};

use rustyline::error::ReadlineError;
use thiserror::Error;

use super::Endpoint;

/// Server-level errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// The listening socket could not be set up
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Accepting a connection failed after the listener was running
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// Reading from a connection failed
    #[error("Failed to receive from {endpoint}: {source}")]
    Receive {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },

    /// No data arrived within the configured read timeout
    #[error("No data from {endpoint} within {timeout:?}")]
    ReadTimeout { endpoint: Endpoint, timeout: Duration },
}

/// Per-recipient write failure during a broadcast
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Failed to send to {endpoint}: {source}")]
    Io {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },

    #[error("Connection to {0} is already closed")]
    Closed(Endpoint),
}

/// Errors reading the listen port from the operator
#[derive(Debug, Error)]
pub enum PortParseError {
    #[error("Failed to read port from console: {0}")]
    Input(#[from] ReadlineError),

    #[error("Invalid port '{0}': expected an integer between 1 and 65535")]
    Invalid(String),
}
