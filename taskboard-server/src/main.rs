//! Taskboard server: serves and edits a JSON task collection over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 127.0.0.1:3000 with ./taskboard.json
//! cargo run --bin taskboard-server
//!
//! # Custom address and data file
//! cargo run --bin taskboard-server -- --bind 0.0.0.0:8080 --data-file /srv/tasks.json
//!
//! # Or via environment variables
//! TASKBOARD_ADDR=0.0.0.0:8080 TASKBOARD_DATA=/srv/tasks.json cargo run --bin taskboard-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::server::{self, AppState};
use taskboard_server::store::JsonFileStore;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        addr = %config.bind_addr,
        data_file = %config.data_file.display(),
        "starting taskboard server"
    );

    let state = Arc::new(AppState::new(JsonFileStore::new(&config.data_file)));

    match server::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskboard server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start taskboard server");
            std::process::exit(1);
        }
    }
}
