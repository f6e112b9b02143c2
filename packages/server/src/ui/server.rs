//! Server lifecycle: binding, the accept loop and graceful teardown.

use std::{net::SocketAddr, sync::Arc};

use tokio::{net::TcpListener, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{config::ServerConfig, domain::RelayError};

use super::{handler::accept_connection, listener::Listener, state::AppState};

/// TCP broadcast relay server
///
/// Created bound by [`Server::bind`] (or around any [`Listener`] with
/// [`Server::with_listener`]); [`Server::run`] then accepts clients until
/// the listener fails or the shutdown token is cancelled.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(InMemoryConnectionRegistry::new());
/// let state = Arc::new(AppState::new(registry));
/// let server = Server::bind(ServerConfig::default(), state).await?;
/// server.run(CancellationToken::new()).await?;
/// ```
pub struct Server {
    listener: Box<dyn Listener>,
    local_addr: SocketAddr,
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Bind`] if the address is unavailable.
    pub async fn bind(config: ServerConfig, state: Arc<AppState>) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| RelayError::Bind {
                addr: config.bind_addr,
                source,
            })?;
        Self::with_listener(listener, config, state)
    }

    /// Wrap an already bound listener
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Bind`] if the listener has no local address.
    pub fn with_listener(
        listener: impl Listener + 'static,
        config: ServerConfig,
        state: Arc<AppState>,
    ) -> Result<Self, RelayError> {
        let local_addr = listener.local_addr().map_err(|source| RelayError::Bind {
            addr: config.bind_addr,
            source,
        })?;

        tracing::info!("Relay server listening on {}", local_addr);

        let listener: Box<dyn Listener> = Box::new(listener);

        Ok(Self {
            listener,
            local_addr,
            config,
            state,
        })
    }

    /// Address the server is actually listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the accept loop
    ///
    /// Returns once accepting has stopped and every connection task has finished.
    /// Cancelling `shutdown` stops accepting and disconnects every client without
    /// departure notices.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Accept`] if accepting failed. Connections that were
    /// already established keep running until they disconnect or `shutdown` is
    /// cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), RelayError> {
        let Server {
            listener,
            local_addr,
            config,
            state,
        } = self;

        tracing::info!("Accepting connections on {}", local_addr);
        let mut connections = JoinSet::new();

        let outcome = loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    break Ok(());
                }
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!("Connection task failed: {}", e);
                    }
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        accept_connection(stream, addr, &state, &config, &shutdown, &mut connections)
                            .await;
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {}", e);
                        break Err(RelayError::Accept(e));
                    }
                },
            }
        };

        drop(listener);
        tracing::info!("Stopped accepting connections");

        while let Some(joined) = connections.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Connection task failed: {}", e);
            }
        }

        // Loops that panicked never unregistered themselves
        for peer in state.registry.clear().await {
            peer.close().await;
        }

        tracing::info!("Server shutdown complete");
        outcome
    }
}
