//! RAX Drive - Entry Point
//!
//! Storage daemon hosting the multi-owner drive core: confined
//! per-owner file trees under a single root, with scheduled
//! reclamation of temporary archive bundles.

use env_logger;
use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use rax_drive::{Archiver, FileStore, PathResolver, RetentionSweeper, StorageConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching drive storage daemon...");

    let config = match StorageConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let resolver = match PathResolver::new(config.root_path()) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Storage root initialization failed: {}", e);
            error!("Resolve this issue manually and try starting the daemon again");
            error!("You can change the root directory in config.toml via the root_dir property");
            return ExitCode::FAILURE;
        }
    };

    let store = FileStore::new(resolver);
    let archiver = match Archiver::new(store.clone(), &config.temp_dir_name) {
        Ok(archiver) => Arc::new(archiver),
        Err(e) => {
            error!("Temp directory initialization failed: {}", e);
            error!("You can change the temp directory in config.toml via the temp_dir_name property");
            return ExitCode::FAILURE;
        }
    };

    let sweeper = RetentionSweeper::start(Arc::clone(&archiver), config.retention_interval());

    info!(
        "Drive storage daemon ready, root at {}",
        store.resolver().root().display()
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down");
    sweeper.stop().await;
    ExitCode::SUCCESS
}
