use blowpipe::client::roster::RosterSync;
use blowpipe::client::{ConnectionState, OutboundHandle, SessionEngine};
use blowpipe::config::{Config, HealthConfig, StoreConfig};
use blowpipe::core::commands;
use blowpipe::core::dispatch::{Dispatcher, Services};
use blowpipe::core::store::StoreClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn test_config(endpoint: &str) -> Config {
    Config {
        endpoint: endpoint.to_string(),
        username: "Blowpipe".to_string(),
        password: Some("hunter2".to_string()),
        avatar: None,
        rooms: vec!["lobby".to_string()],
        private_rooms: vec![],
        command_prefix: '!',
        administrators: vec![],
        reconnect_delay_ms: 15000,
        throttle_interval_ms: 300,
        login_url: "https://login.example/action.php".to_string(),
        store: StoreConfig {
            url: "http://127.0.0.1:9/store".to_string(),
            secret: String::new(),
        },
        health: HealthConfig::default(),
        log_level: "info".to_string(),
    }
}

fn build_engine(endpoint: &str) -> SessionEngine {
    let config = Arc::new(test_config(endpoint));
    let http = reqwest::Client::new();
    let store = Arc::new(StoreClient::new(&config, http.clone()));
    let (tx, rx) = mpsc::unbounded_channel();
    let outbound = OutboundHandle::new(tx);
    let services = Services {
        config: config.clone(),
        store: store.clone(),
        outbound: outbound.clone(),
    };
    let dispatcher = Dispatcher::new(Arc::new(commands::build_registry()), services);
    let roster = RosterSync::new(config.clone(), store, outbound.clone());
    SessionEngine::new(config, http, dispatcher, roster, outbound, rx)
}

#[tokio::test]
async fn test_engine_starts_disconnected() {
    let engine = build_engine("ws://127.0.0.1:1/chat/websocket");
    assert_eq!(engine.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_refused_endpoint_keeps_the_engine_retrying() {
    // Nothing listens on port 1, so every connect attempt fails and the
    // engine cycles between connecting and waiting out the reconnect delay.
    let mut engine = build_engine("ws://127.0.0.1:1/chat/websocket");

    let outcome = tokio::time::timeout(Duration::from_secs(60), engine.run()).await;
    assert!(outcome.is_err(), "a refused endpoint must not end the session");
    assert!(matches!(
        engine.state(),
        ConnectionState::Connecting | ConnectionState::Reconnecting
    ));
}
