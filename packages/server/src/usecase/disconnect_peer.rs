//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//! - Registry からの削除、ストリームのクローズ、退出通知
//!
//! ### なぜこのテストが必要か
//! - 退出通知の前に Registry から削除され、本人に通知が届かないことを保証
//! - 受信エラーでも正常切断と同じく通知されることを保証
//! - シャットダウン時は通知しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：正常切断・受信エラーでの切断
//! - エッジケース：最後の接続の切断、削除済み接続の二重切断
//! - シャットダウン

use std::sync::Arc;

use hiroba_shared::time::{
    elapsed_millis, format_duration, now_millis, timestamp_to_local_rfc3339,
};

use crate::domain::{ConnectionRegistry, DisconnectReason, Notice, Peer};

use super::{BroadcastReport, BroadcastUseCase};

/// 切断のユースケース
pub struct DisconnectPeerUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// BroadcastUseCase（退出通知の送信）
    broadcast_usecase: Arc<BroadcastUseCase>,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        broadcast_usecase: Arc<BroadcastUseCase>,
    ) -> Self {
        Self {
            registry,
            broadcast_usecase,
        }
    }

    /// 切断を実行
    ///
    /// 1. Registry から削除
    /// 2. ストリームを閉じる
    /// 3. 理由が通知対象なら残りの接続に退出通知をブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Some(BroadcastReport)` - 退出通知を送信した
    /// * `None` - 通知なし（シャットダウン、または既に削除済み）
    pub async fn execute(
        &self,
        peer: &Arc<dyn Peer>,
        reason: DisconnectReason,
    ) -> Option<BroadcastReport> {
        let removed = self.registry.remove(&peer.id()).await;
        peer.close().await;

        if removed.is_none() {
            tracing::debug!("Connection {} was already removed", peer.endpoint());
            return None;
        }

        let connected_at = peer.connected_at();
        tracing::info!(
            "Disconnected from {} ({:?}, connected since {} for {})",
            peer.endpoint(),
            reason,
            timestamp_to_local_rfc3339(connected_at).unwrap_or_default(),
            format_duration(elapsed_millis(connected_at, now_millis()))
        );

        if !reason.notifies_peers() {
            return None;
        }

        let notice = Notice::Left(peer.endpoint()).to_string();
        Some(self.broadcast_usecase.execute(&peer.id(), &notice).await)
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_peers(&self) -> usize {
        self.registry.count().await
    }
}
