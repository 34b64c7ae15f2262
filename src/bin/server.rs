//! Datashelf Server
//!
//! HTTP service resolving dataset identifiers against a partitioned object
//! store and issuing presigned download URLs.

use anyhow::Context;
use clap::Parser;
use datashelf::http::{router, AppState};
use datashelf::{Config, S3Store};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "datashelf-server")]
#[command(about = "Dataset resolution and presigned-download service")]
struct Args {
    /// Bind address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number
    #[arg(short = 'P', long, default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting Datashelf Server");

    let config = Config::from_env().context("loading configuration from environment")?;
    info!(
        bucket = %config.bucket,
        region = %config.region,
        prefix = %config.prefix,
        default_ttl_secs = config.default_ttl_secs,
        "configuration loaded"
    );

    let store = S3Store::from_config(&config).context("initializing S3 store")?;

    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("parsing bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C, shutting down...");
        })
        .await
        .context("serving HTTP")?;

    info!("Server stopped");
    Ok(())
}
