//! Join/departure notices.

use std::fmt;

use super::Endpoint;

/// Synthesized text announcing a connection's arrival or removal.
///
/// Notices are relayed exactly like client payloads, so the rendered text is
/// what goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Joined(Endpoint),
    Left(Endpoint),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Joined(endpoint) => write!(f, "{} joined", endpoint),
            Notice::Left(endpoint) => write!(f, "{} left", endpoint),
        }
    }
}
