// src/client/mod.rs

//! The session engine and everything that feeds it: the connection
//! lifecycle, the outbound throttle, login, and roster bookkeeping.

pub mod login;
pub mod outbound;
pub mod roster;
pub mod session;
pub mod throttle;

pub use outbound::OutboundHandle;
pub use session::{ConnectionState, ControlEvent, SessionEngine};
pub use throttle::Throttle;

use crate::config::Config;
use crate::core::BlowpipeError;
use crate::core::commands;
use crate::core::dispatch::{Dispatcher, Services};
use crate::core::store::StoreClient;
use crate::health;
use roster::RosterSync;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Wires up all collaborators and runs the session engine until a fatal
/// error. Transport failures are absorbed by the engine's reconnect loop,
/// so under normal operation this never returns.
pub async fn run(config: Config) -> Result<(), BlowpipeError> {
    let config = Arc::new(config);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| BlowpipeError::Config(format!("failed to build HTTP client: {e}")))?;

    let store = Arc::new(StoreClient::new(&config, http.clone()));

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let outbound = OutboundHandle::new(outbound_tx);

    let registry = Arc::new(commands::build_registry());
    info!("Registered {} command entries", registry.len());

    let services = Services {
        config: config.clone(),
        store: store.clone(),
        outbound: outbound.clone(),
    };
    let dispatcher = Dispatcher::new(registry, services);
    let roster = RosterSync::new(config.clone(), store, outbound.clone());

    if config.health.enabled {
        tokio::spawn(health::serve(config.health.port));
    }

    let mut engine = SessionEngine::new(config, http, dispatcher, roster, outbound, outbound_rx);
    engine.run().await
}
