//! Helpers for driving a real relay server over loopback TCP.

#![allow(dead_code)]

use std::{
    io,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use hiroba_server::{
    config::ServerConfig,
    domain::{ConnectionRegistry, RelayError},
    infrastructure::registry::InMemoryConnectionRegistry,
    ui::{Listener, Server, state::AppState},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
    time::Instant,
};
use tokio_util::sync::CancellationToken;

/// Upper bound for anything that is expected to happen
pub const WAIT: Duration = Duration::from_secs(3);

/// Window in which nothing is expected to arrive
pub const SILENCE: Duration = Duration::from_millis(200);

/// Relay server running on an ephemeral loopback port
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<InMemoryConnectionRegistry>,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<Result<(), RelayError>>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let state = Arc::new(AppState::new(registry.clone()));
        let server = Server::bind(config, state)
            .await
            .expect("Failed to bind test server");
        Self::spawn(server, registry)
    }

    /// Start a server whose listener fails after `accepts` successful accepts
    pub async fn start_with_failing_listener(accepts: usize) -> Self {
        let listener = FailingListener::bind(accepts).await;
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let state = Arc::new(AppState::new(registry.clone()));
        let server = Server::with_listener(listener, ServerConfig::default(), state)
            .expect("Failed to wrap test listener");
        Self::spawn(server, registry)
    }

    fn spawn(server: Server, registry: Arc<InMemoryConnectionRegistry>) -> Self {
        let addr = server.local_addr();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server.run(shutdown.clone()));

        TestServer {
            addr,
            registry,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Connect a client and wait until the server has registered `expected` connections
    pub async fn connect(&self, expected: usize) -> TestClient {
        let client = TestClient::connect(self.addr).await;
        self.wait_for_connections(expected).await;
        client
    }

    pub async fn wait_for_connections(&self, expected: usize) {
        let registry = self.registry.clone();
        tokio::time::timeout(WAIT, async move {
            while registry.count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("Registry never reached {} connections", expected));
    }

    /// Whether `run` has not returned yet
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the server and wait for `run` to return
    pub async fn shutdown(mut self) -> Result<(), RelayError> {
        self.shutdown.cancel();
        self.join().await
    }

    /// Wait for `run` to return on its own
    pub async fn wait_for_exit(mut self) -> Result<(), RelayError> {
        self.join().await
    }

    async fn join(&mut self) -> Result<(), RelayError> {
        let handle = self.handle.take().expect("Server already stopped");
        tokio::time::timeout(WAIT, handle)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked")
    }
}

/// Loopback listener that reports an error once its accept allowance is used up
pub struct FailingListener {
    inner: TcpListener,
    remaining: AtomicUsize,
}

impl FailingListener {
    pub async fn bind(accepts: usize) -> Self {
        let inner = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        FailingListener {
            inner,
            remaining: AtomicUsize::new(accepts),
        }
    }
}

#[async_trait]
impl Listener for FailingListener {
    async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        let allowed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(io::Error::other("too many open files"));
        }
        self.inner.accept().await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Plain TCP client of the relay
pub struct TestClient {
    pub addr: SocketAddr,
    stream: TcpStream,
}

impl TestClient {
    pub async fn connect(server: SocketAddr) -> Self {
        let stream = TcpStream::connect(server)
            .await
            .expect("Failed to connect to test server");
        let addr = stream.local_addr().expect("Client has no local address");
        TestClient { addr, stream }
    }

    pub async fn send(&mut self, text: &str) {
        self.stream
            .write_all(text.as_bytes())
            .await
            .expect("Failed to send");
    }

    pub async fn send_bytes(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.expect("Failed to send");
    }

    /// Write 64 KiB chunks for `duration` without ever reading, tolerating stalls
    pub async fn flood(&mut self, duration: Duration) -> usize {
        let chunk = vec![b'x'; 64 * 1024];
        let deadline = Instant::now() + duration;
        let mut written = 0;
        while Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(100), self.stream.write_all(&chunk))
                .await
            {
                Ok(Ok(())) => written += chunk.len(),
                Ok(Err(_)) => break,
                Err(_) => {}
            }
        }
        written
    }

    /// Read exactly `expected.len()` bytes and compare them with `expected`
    pub async fn expect_text(&mut self, expected: &str) {
        let mut buf = vec![0u8; expected.len()];
        tokio::time::timeout(WAIT, self.stream.read_exact(&mut buf))
            .await
            .unwrap_or_else(|_| panic!("Timed out waiting for {:?}", expected))
            .expect("Failed to read");
        assert_eq!(String::from_utf8_lossy(&buf), expected);
    }

    /// Assert nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        let mut buf = [0u8; 256];
        match tokio::time::timeout(SILENCE, self.stream.read(&mut buf)).await {
            Err(_) => {}
            Ok(Ok(n)) => panic!(
                "Expected silence but received {:?}",
                String::from_utf8_lossy(&buf[..n])
            ),
            Ok(Err(e)) => panic!("Expected silence but read failed: {}", e),
        }
    }

    /// Read everything until the server closes the connection
    pub async fn read_to_end(&mut self) -> String {
        let mut buf = Vec::new();
        tokio::time::timeout(WAIT, self.stream.read_to_end(&mut buf))
            .await
            .expect("Server did not close the connection")
            .expect("Failed to read");
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Read whatever arrives within `window`
    pub async fn read_available(&mut self, window: Duration) -> String {
        let mut buf = [0u8; 1024];
        match tokio::time::timeout(window, self.stream.read(&mut buf)).await {
            Ok(Ok(n)) => String::from_utf8_lossy(&buf[..n]).into_owned(),
            _ => String::new(),
        }
    }
}
