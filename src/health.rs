// src/health.rs

//! A minimal liveness endpoint. Hosting platforms probe it to decide
//! whether the process should be restarted; it always answers 200.

use axum::Router;
use std::net::SocketAddr;
use tracing::{error, info};

async fn liveness() -> &'static str {
    "blowpipe"
}

/// Runs the always-200 HTTP responder on the configured port.
pub async fn serve(port: u16) {
    let app = Router::new().fallback(liveness);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind health endpoint on port {}: {}", port, e);
            return;
        }
    };
    info!("Health endpoint listening on http://{}/", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Health endpoint error: {}", e);
    }
}
