//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() と broadcast_joined()
//!
//! ### なぜこのテストが必要か
//! - 新しい接続が Registry に登録されることを保証
//! - 参加通知が既存の接続にだけ届き、本人には届かないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存接続がある状態での参加
//! - エッジケース：最初の接続（通知対象なし）

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Notice, Peer};

use super::{BroadcastReport, BroadcastUseCase};

/// 接続のユースケース
pub struct ConnectPeerUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// BroadcastUseCase（参加通知の送信）
    broadcast_usecase: Arc<BroadcastUseCase>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        broadcast_usecase: Arc<BroadcastUseCase>,
    ) -> Self {
        Self {
            registry,
            broadcast_usecase,
        }
    }

    /// 接続を Registry に登録
    ///
    /// # Returns
    ///
    /// 登録後の接続数
    pub async fn execute(&self, peer: Arc<dyn Peer>) -> usize {
        self.registry.add(peer).await;
        self.registry.count().await
    }

    /// 接続したことを他の接続にブロードキャスト
    ///
    /// 登録（`execute`）の後に呼び出すこと。本人は送信者として除外される。
    pub async fn broadcast_joined(&self, peer: &Arc<dyn Peer>) -> BroadcastReport {
        let notice = Notice::Joined(peer.endpoint()).to_string();
        self.broadcast_usecase.execute(&peer.id(), &notice).await
    }
}
