//! Serve command handler

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::server::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// Handle the serve command; runs until Ctrl-C
#[instrument(skip_all)]
pub async fn handle_serve(args: ServeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let addr = match args.bind {
        Some(addr) => addr,
        None => config.bind_addr()?,
    };

    let orchestrator = config.orchestrator(args.store.as_deref())?;
    let app = build_router(AppState::new(
        orchestrator,
        config.server.allowed_origins.clone(),
    ));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    info!(%local_addr, "Server listening");
    output.success(&format!("✓ Listening on http://{}", local_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
