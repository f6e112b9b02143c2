//! Connection handlers: registration of accepted streams and the receive loop.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{
    io::AsyncReadExt,
    net::{TcpStream, tcp::OwnedReadHalf},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    domain::{ConnectionIdFactory, DisconnectReason, Endpoint, Peer, RelayError, Utf8ChunkDecoder},
    infrastructure::peer::TcpPeer,
    ui::state::AppState,
};

/// Settings each receive loop needs from the server configuration
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReceiveOptions {
    pub buffer_size: usize,
    pub read_timeout: Option<Duration>,
}

impl From<&ServerConfig> for ReceiveOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            buffer_size: config.buffer_size,
            read_timeout: config.read_timeout,
        }
    }
}

/// Register an accepted stream, start its receive loop and announce it.
///
/// The receive loop is spawned onto `connections` so the server can wait for
/// every loop during shutdown.
pub(crate) async fn accept_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: &Arc<AppState>,
    config: &ServerConfig,
    shutdown: &CancellationToken,
    connections: &mut JoinSet<()>,
) {
    let endpoint = Endpoint::from(addr);
    tracing::info!("Connection from {}", endpoint);

    if config.tcp_nodelay
        && let Err(e) = stream.set_nodelay(true)
    {
        tracing::warn!("Failed to set TCP_NODELAY for {}: {}", endpoint, e);
    }

    let (reader, writer) = stream.into_split();
    let peer: Arc<dyn Peer> = Arc::new(TcpPeer::new(
        ConnectionIdFactory::generate(),
        endpoint,
        writer,
    ));

    // Register before announcing: the join notice excludes the new peer by id
    let connected = state.connect_peer_usecase.execute(peer.clone()).await;
    tracing::info!("{} connected ({} connected)", endpoint, connected);

    connections.spawn(receive_loop(
        reader,
        peer.clone(),
        state.clone(),
        ReceiveOptions::from(config),
        shutdown.child_token(),
    ));

    tokio::select! {
        _ = shutdown.cancelled() => {
            tracing::debug!("Shutdown interrupted the join notice for {}", endpoint);
        }
        report = state.connect_peer_usecase.broadcast_joined(&peer) => {
            tracing::debug!(
                "Announced {} to {} peers ({} failed)",
                endpoint,
                report.delivered,
                report.failed
            );
        }
    }
}

/// Read chunks from one client and relay them until it goes away.
async fn receive_loop(
    mut reader: OwnedReadHalf,
    peer: Arc<dyn Peer>,
    state: Arc<AppState>,
    options: ReceiveOptions,
    shutdown: CancellationToken,
) {
    let endpoint = peer.endpoint();
    let mut buffer = vec![0u8; options.buffer_size];
    let mut decoder = Utf8ChunkDecoder::new();

    let reason = loop {
        let read = tokio::select! {
            _ = shutdown.cancelled() => break DisconnectReason::Shutdown,
            read = read_chunk(&mut reader, &mut buffer, options.read_timeout, endpoint) => read,
        };

        match read {
            Ok(0) => {
                if let Some(rest) = decoder.finish()
                    && !relay(&state, &peer, &rest, &shutdown).await
                {
                    break DisconnectReason::Shutdown;
                }
                break DisconnectReason::Closed;
            }
            Ok(n) => {
                let text = decoder.decode(&buffer[..n]);
                if !text.is_empty() && !relay(&state, &peer, &text, &shutdown).await {
                    break DisconnectReason::Shutdown;
                }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                break DisconnectReason::ReceiveFailed;
            }
        }
    };

    state
        .disconnect_peer_usecase
        .execute(&peer, reason)
        .await;
    tracing::debug!(
        "{} connections remaining after {} left",
        state.disconnect_peer_usecase.count_remaining_peers().await,
        endpoint
    );
}

/// Broadcast received text. Returns `false` if shutdown interrupted the broadcast.
async fn relay(
    state: &AppState,
    peer: &Arc<dyn Peer>,
    text: &str,
    shutdown: &CancellationToken,
) -> bool {
    tracing::info!("Received from {} << {}", peer.endpoint(), text);
    let peer_id = peer.id();
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = state.broadcast_usecase.execute(&peer_id, text) => true,
    }
}

async fn read_chunk(
    reader: &mut OwnedReadHalf,
    buffer: &mut [u8],
    read_timeout: Option<Duration>,
    endpoint: Endpoint,
) -> Result<usize, RelayError> {
    let read = match read_timeout {
        Some(timeout) => tokio::time::timeout(timeout, reader.read(buffer))
            .await
            .map_err(|_| RelayError::ReadTimeout { endpoint, timeout })?,
        None => reader.read(buffer).await,
    };
    read.map_err(|source| RelayError::Receive { endpoint, source })
}
