use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use forecast_server::{app, AppState, Args};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = args.analysis_config();
    config.validate()?;
    let state = AppState::new(args.source_opener()?, config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid HOST:PORT configuration")?;

    info!("forecast_server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
    info!("Health check: http://{}/", addr);
    info!("Analysis endpoint: http://{}/get_map_value", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
