//! bz-server: HTTP API over the item repository and image store.
//!
//! Route handlers are thin adapters; all persistence goes through the
//! [`bz_core::ItemRepository`] trait object and [`bz_store::ImageStore`]
//! held in [`context::AppContext`].

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use bz_core::config::Config;

use crate::context::AppContext;

/// Start the bazaar server and serve until a shutdown signal arrives.
pub async fn start(config: Config) -> bz_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let host = config.server.host.clone();
    let port = config.server.port;

    let ctx = AppContext::open(config)?;
    tracing::info!(backend = ctx.items.backend_name(), "Item repository ready");
    tracing::info!("Images stored under {}", ctx.images.root().display());

    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| {
            bz_core::Error::Internal(format!("Failed to bind to {host}:{port}: {e}"))
        })?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
