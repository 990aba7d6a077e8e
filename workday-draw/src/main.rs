mod assignment;
mod cli;
mod config;
mod error;
mod render;
mod server;
mod spreadsheet;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::Config;
use crate::server::{AppState, router};
use crate::storage::UploadStore;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli).context("Failed to load configuration")?;

    // Storage problems are fatal before we accept any traffic
    let store = UploadStore::init(&config.storage.upload_dir, config.storage.retention())
        .with_context(|| {
            format!(
                "Could not set up upload directory at {}",
                config.storage.upload_dir.display()
            )
        })?;
    log::info!("Upload directory ready at {}", store.dir().display());
    let store = Arc::new(store);
    let sweeper = Arc::clone(&store).spawn_sweeper(config.storage.sweep_interval());

    let app = router(AppState::new(store), config.server.max_upload_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Server started at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    Ok(())
}
