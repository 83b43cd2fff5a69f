//! Elidune Desk - flat-file lending desk
//!
//! Interactive console over the members, items and loans collections.

use std::io;

use anyhow::Context;

use elidune_desk::{
    config::AppConfig,
    console::Console,
    logging,
    repository::{JsonStore, Repository},
    services::Services,
};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let _guard = logging::init(&config.logging)?;

    tracing::info!("Starting Elidune Desk v{}", env!("CARGO_PKG_VERSION"));

    let store = JsonStore::new(&config.storage);
    if config.storage.create_missing {
        store
            .ensure_collections()
            .context("Failed to prepare data directory")?;
    }
    tracing::info!("Using data directory {}", config.storage.data_dir.display());

    // Create repository and services
    let repository = Repository::new(store);
    let services = Services::new(repository, &config);

    let stdin = io::stdin();
    let mut console = Console::new(services, stdin.lock(), io::stdout());
    console.run()?;

    tracing::info!("Elidune Desk stopped");
    Ok(())
}
