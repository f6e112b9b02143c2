//! Server state shared by the accept loop and every connection task.

use std::sync::Arc;

use crate::{
    domain::ConnectionRegistry,
    usecase::{BroadcastUseCase, ConnectPeerUseCase, DisconnectPeerUseCase},
};

/// Shared application state
pub struct AppState {
    /// ConnectionRegistry（接続管理の抽象化）
    pub registry: Arc<dyn ConnectionRegistry>,
    /// BroadcastUseCase（メッセージ中継のユースケース）
    pub broadcast_usecase: Arc<BroadcastUseCase>,
    /// ConnectPeerUseCase（接続のユースケース）
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// DisconnectPeerUseCase（切断のユースケース）
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
}

impl AppState {
    /// Wire every use case to the given registry
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcast_usecase = Arc::new(BroadcastUseCase::new(registry.clone()));
        let connect_peer_usecase = Arc::new(ConnectPeerUseCase::new(
            registry.clone(),
            broadcast_usecase.clone(),
        ));
        let disconnect_peer_usecase = Arc::new(DisconnectPeerUseCase::new(
            registry.clone(),
            broadcast_usecase.clone(),
        ));

        Self {
            registry,
            broadcast_usecase,
            connect_peer_usecase,
            disconnect_peer_usecase,
        }
    }
}
