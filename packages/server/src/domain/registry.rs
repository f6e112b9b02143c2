//! Connection registry trait

use std::sync::Arc;

use async_trait::async_trait;

use super::{ConnectionId, Peer};

/// Shared set of live connections.
///
/// All operations are total. Implementations synchronize internally, so
/// concurrent adds, removes and snapshots never observe a half-updated set.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a connection
    async fn add(&self, peer: Arc<dyn Peer>);

    /// Remove a connection by identity, returning it if it was registered.
    ///
    /// Removing an absent connection is a no-op.
    async fn remove(&self, id: &ConnectionId) -> Option<Arc<dyn Peer>>;

    /// Copy of every registered connection except `sender`, in registration order.
    async fn snapshot_excluding(&self, sender: &ConnectionId) -> Vec<Arc<dyn Peer>>;

    /// Number of registered connections
    async fn count(&self) -> usize;

    /// Remove every connection, returning them for teardown
    async fn clear(&self) -> Vec<Arc<dyn Peer>>;
}
