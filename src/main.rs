//! Sandbox Gateway (v1)
//!
//! Reverse proxy that owns all inbound traffic for the sandbox cluster.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                     GATEWAY                      │
//!                          │                                                  │
//!     Client Request       │  ┌─────────┐    ┌─────────┐    ┌─────────────┐  │
//!     ─────────────────────┼─▶│  axum   │───▶│ routing │───▶│   header    │  │
//!                          │  │ server  │    │  table  │    │  sanitizer  │  │
//!                          │  └─────────┘    └─────────┘    └──────┬──────┘  │
//!                          │                                       ▼         │
//!     Client Response      │  ┌─────────┐    ┌─────────┐    ┌─────────────┐  │
//!     ◀────────────────────┼──│  proxy  │◀───│ metrics │◀───│  upstream   │◀─┼──── Upstream
//!                          │  │ engine  │    │recorder │    │   client    │  │     origin
//!                          │  └─────────┘    └─────────┘    └─────────────┘  │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sandbox_gateway::config::load_config;
use sandbox_gateway::observability::logging::init_logging;
use sandbox_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "sandbox-gateway")]
#[command(about = "Path-routed reverse proxy for the sandbox cluster", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var_os("GATEWAY_CONFIG").map(PathBuf::from));

    let config = load_config(config_path.as_deref())?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        allowed_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().trigger_on_signal());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
