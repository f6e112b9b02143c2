//! Per-connection handlers.

mod connection;

pub(crate) use connection::accept_connection;
