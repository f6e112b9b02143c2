//! UseCase layer
//!
//! Relay operations built on the domain traits: broadcasting a payload and
//! the connect/disconnect flows that keep the registry and peers in sync.

mod broadcast;
mod connect_peer;
mod disconnect_peer;

pub use broadcast::{BroadcastReport, BroadcastUseCase};
pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
