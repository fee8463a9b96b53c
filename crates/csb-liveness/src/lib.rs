//! Liveness HTTP server.
//!
//! Hosting platforms poll this to decide whether the bot process is alive.
//! Every GET, whatever the path, gets the same 200 response.

use std::net::SocketAddr;

use axum::{response::Html, routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const LIVENESS_BODY: &str = "Bot is running successfully!";

/// Router answering GET on any path.
pub fn router() -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/{*path}", get(liveness_handler))
}

async fn liveness_handler() -> Html<&'static str> {
    Html(LIVENESS_BODY)
}

/// Serve the liveness router on `0.0.0.0:port` until `shutdown` is cancelled.
pub async fn serve(port: u16, shutdown: CancellationToken) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("liveness server listening on http://{addr}");

    axum::serve(listener, router())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("liveness server stopped");
    Ok(())
}
