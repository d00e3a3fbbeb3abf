// src/main.rs

//! The main entry point for the blowpipe chat bot.

use anyhow::Result;
use blowpipe::client;
use blowpipe::config::Config;
use std::env;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("blowpipe version {VERSION}");
        return Ok(());
    }

    // The configuration path defaults to "config.toml" and can be overridden
    // with the --config flag.
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("config.toml");

    let config = match Config::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{config_path}\": {e}");
            std::process::exit(1);
        }
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .compact()
        .with_ansi(true)
        .init();

    if let Err(e) = client::run(config).await {
        error!("Client runtime error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
