//! UseCase: ブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastUseCase::execute() メソッド
//! - 送信者以外の全接続への送信と、宛先ごとの失敗の分離
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にメッセージが戻らないことを保証
//! - 1 つの宛先への送信失敗で他の宛先への配信が止まらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数の宛先への配信
//! - エッジケース：送信者しかいない（宛先なし）
//! - 異常系：一部の宛先で送信失敗

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信に成功した宛先の数
    pub delivered: usize,
    /// 送信に失敗した宛先の数
    pub failed: usize,
}

/// ブロードキャストのユースケース
pub struct BroadcastUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl BroadcastUseCase {
    /// 新しい BroadcastUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 送信者以外の全接続にテキストを送信
    ///
    /// 宛先は呼び出し時点のスナップショット順に 1 件ずつ、書き込み完了を待って送信します。
    /// 送信失敗はログに記録し、残りの宛先への送信を続けます。
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の ConnectionId（宛先から除外）
    /// * `text` - 送信するテキスト
    pub async fn execute(&self, sender: &ConnectionId, text: &str) -> BroadcastReport {
        let payload = text.as_bytes();
        let recipients = self.registry.snapshot_excluding(sender).await;

        let mut report = BroadcastReport::default();
        for recipient in recipients {
            match recipient.send(payload).await {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!("Sent to {} >> {}", recipient.endpoint(), text);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("{}", e);
                }
            }
        }

        report
    }
}
