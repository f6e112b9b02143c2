//! TCP broadcast relay server.
//!
//! Relays everything a client sends to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use hiroba_server::{
    config::{DEFAULT_BUFFER_SIZE, ServerConfig},
    infrastructure::registry::InMemoryConnectionRegistry,
    ui::{Server, console::prompt_listen_port, signal::shutdown_signal, state::AppState},
};
use hiroba_shared::{logger::setup_logger, network::local_ipv4_or_loopback};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "TCP broadcast relay server", long_about = None)]
struct Args {
    /// Host address to bind to (default: this machine's local IPv4 address)
    #[arg(short = 'H', long)]
    host: Option<IpAddr>,

    /// Port number to bind to (prompted for when omitted)
    #[arg(short = 'p', long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Receive buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Disconnect clients that send nothing for this many seconds
    #[arg(long)]
    read_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("hiroba-server", env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let host = args
        .host
        .unwrap_or_else(|| IpAddr::V4(local_ipv4_or_loopback()));
    let port = match args.port {
        Some(port) => port,
        None => match prompt_listen_port() {
            Ok(port) => port,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
    };

    let config = ServerConfig::new(SocketAddr::new(host, port))
        .with_buffer_size(args.buffer_size)
        .with_read_timeout(args.read_timeout_secs.map(Duration::from_secs));

    // Initialize dependencies in order:
    // 1. Registry
    // 2. UseCases (AppState)
    // 3. Server

    // 1. Create Registry (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new());

    // 2. Create UseCases
    let state = Arc::new(AppState::new(registry));

    // 3. Bind and run the server
    let server = match Server::bind(config, state).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    if let Err(e) = server.run(shutdown).await {
        tracing::warn!("Relay stopped: {}", e);
    }
}
