//! HTTP server lifecycle.

mod shutdown;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Binds the listener and serves the router until a shutdown signal.
pub async fn serve(router: Router, config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        %addr,
        "server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::shutdown_signal(config.shutdown_timeout()))
        .await
        .context("server error")?;

    Ok(())
}
