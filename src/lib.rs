use std::sync::Arc;

use anyhow::Context;
use axum::Router;

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult, StoreError};

use routes::{create_router, AppState};
use services::{store, GroupStore, PexelsClient};

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Loads the catalog, opens the database and assembles the router
///
/// Fails when the destination catalog is missing or malformed, before any
/// database file is created.
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let destinations = store::load_destinations(&config.destinations_path)
        .context("Failed to load destination catalog")?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to open database")?;

    let image_search = Arc::new(PexelsClient::new(
        config.pexels_api_key.clone(),
        config.pexels_api_url.clone(),
    ));

    let state = AppState::new(destinations, image_search, GroupStore::new(pool));
    Ok(create_router(state))
}
