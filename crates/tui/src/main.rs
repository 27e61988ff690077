mod app;
mod editors;
mod forms;
mod list;
mod theme;

use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use gamevault_core::{
    config::{self, AppConfig},
    ApiClient, AuthService, ConnectivityMonitor, InventoryStore, SessionStore,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir())?;
    info!(base_url = %config.api.base_url, "starting gamevault");

    let client = ApiClient::new(&config.api)?;
    let auth = AuthService::new(client.clone(), SessionStore::new(config.session_path()));
    auth.restore();
    let store = InventoryStore::new(client.clone());

    let (connectivity_tx, connectivity_rx) = mpsc::channel(8);
    let monitor = ConnectivityMonitor::from_config(client, &config.connectivity);
    tokio::spawn(monitor.run(connectivity_tx));

    let mut app = app::GameVaultApp::new(config, auth, store);
    app.attach_connectivity(connectivity_rx);
    app.run().await
}

/// Log to a file only; the terminal belongs to the UI.
fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("gamevault.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
