//! TCP を使った Peer 実装
//!
//! ## 責務
//!
//! - 接続の書き込み側（`OwnedWriteHalf`）を保持
//! - 同一接続への書き込みの直列化
//!
//! ## 設計ノート
//!
//! 読み込み側は受信ループ（`src/ui/handler/connection.rs`）が専有します。
//! この実装は書き込み側のみを持ち、複数の送信者からのブロードキャストを
//! 接続ごとの Mutex で直列化するため、ペイロード同士がバイト単位で混ざりません。
//!
//! 相手が読み込みを止めると `write_all` は完了しません。`close` は先にトークンを
//! キャンセルして書き込み中の `send` を中断させるため、ロック待ちで止まりません。

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, net::tcp::OwnedWriteHalf, sync::Mutex};
use tokio_util::sync::CancellationToken;

use hiroba_shared::time::now_millis;

use crate::domain::{ConnectionId, Endpoint, Peer, SendError};

/// TCP 接続の書き込み側
pub struct TcpPeer {
    id: ConnectionId,
    endpoint: Endpoint,
    connected_at: i64,
    /// `None` になったら close 済み
    writer: Mutex<Option<OwnedWriteHalf>>,
    /// close 要求（書き込み中の send を中断する）
    closed: CancellationToken,
}

impl TcpPeer {
    /// 新しい TcpPeer を作成（接続時刻は現在時刻）
    pub fn new(id: ConnectionId, endpoint: Endpoint, writer: OwnedWriteHalf) -> Self {
        Self {
            id,
            endpoint,
            connected_at: now_millis(),
            writer: Mutex::new(Some(writer)),
            closed: CancellationToken::new(),
        }
    }

    async fn write_payload(&self, payload: &[u8]) -> Result<(), SendError> {
        let mut writer = self.writer.lock().await;
        let Some(stream) = writer.as_mut() else {
            return Err(SendError::Closed(self.endpoint));
        };

        let io_error = |source| SendError::Io {
            endpoint: self.endpoint,
            source,
        };
        stream.write_all(payload).await.map_err(io_error)?;
        stream.flush().await.map_err(io_error)?;
        Ok(())
    }
}

#[async_trait]
impl Peer for TcpPeer {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    fn connected_at(&self) -> i64 {
        self.connected_at
    }

    async fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(SendError::Closed(self.endpoint)),
            result = self.write_payload(payload) => result,
        }
    }

    async fn close(&self) {
        self.closed.cancel();
        let mut writer = self.writer.lock().await;
        if let Some(mut stream) = writer.take() {
            // 相手が既に切断している場合は失敗するが、どちらにせよ閉じる
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Shutdown of {} failed: {}", self.endpoint, e);
            }
        }
    }
}
