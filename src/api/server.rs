//! Server setup and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use super::routes::create_router;
use super::shared::SharedState;

/// Binds the control API and serves until the shutdown signal fires.
pub async fn run_server(
    port: u16,
    state: Arc<SharedState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), String> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind {}: {}", addr, err))?;

    log::info!("Control API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            log::info!("Control API shutting down");
        })
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}
