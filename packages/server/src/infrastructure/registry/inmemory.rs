//! InMemory ConnectionRegistry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! 接続順を保った Vec を Mutex で保護して保持します。
//!
//! ## 設計ノート
//!
//! ブロードキャストはロックを保持したまま送信しません。`snapshot_excluding` は
//! ロック内で `Arc` を複製して即座にロックを解放するため、送信に時間のかかる
//! 宛先がいても接続の追加・削除は待たされません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, Peer};

/// インメモリ ConnectionRegistry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// 接続中のピア（登録順）
    peers: Mutex<Vec<Arc<dyn Peer>>>,
}

impl InMemoryConnectionRegistry {
    /// 空の InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, peer: Arc<dyn Peer>) {
        let mut peers = self.peers.lock().await;
        tracing::debug!(
            "Connection {} ({}) registered, {} connected",
            peer.id(),
            peer.endpoint(),
            peers.len() + 1
        );
        peers.push(peer);
    }

    async fn remove(&self, id: &ConnectionId) -> Option<Arc<dyn Peer>> {
        let mut peers = self.peers.lock().await;
        let index = peers.iter().position(|peer| peer.id() == *id)?;
        let removed = peers.remove(index);
        tracing::debug!(
            "Connection {} ({}) unregistered, {} connected",
            id,
            removed.endpoint(),
            peers.len()
        );
        Some(removed)
    }

    async fn snapshot_excluding(&self, sender: &ConnectionId) -> Vec<Arc<dyn Peer>> {
        let peers = self.peers.lock().await;
        peers
            .iter()
            .filter(|peer| peer.id() != *sender)
            .cloned()
            .collect()
    }

    async fn count(&self) -> usize {
        self.peers.lock().await.len()
    }

    async fn clear(&self) -> Vec<Arc<dyn Peer>> {
        let mut peers = self.peers.lock().await;
        std::mem::take(&mut *peers)
    }
}
