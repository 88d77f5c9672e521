mod auth;
mod config;
mod db;
mod errors;
mod gallery;
mod layout;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::gallery::{GalleryStore, MemoryGalleryStore, PgGalleryStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gallery API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize item store
    let store: Arc<dyn GalleryStore> = match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            Arc::new(PgGalleryStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory gallery store; items are lost on restart");
            Arc::new(MemoryGalleryStore::new())
        }
    };

    if config.admin_emails.is_empty() {
        warn!("ADMIN_EMAILS is empty; nobody can use the admin endpoints");
    } else {
        info!("{} curator(s) on the admin allowlist", config.admin_emails.len());
    }

    let state = AppState::new(store, config.clone())?;

    let rules = state.layout.rules();
    info!(
        "Layout rules: L every {} cards, max {} M / {} S in a row",
        rules.l_interval, rules.max_m_run, rules.max_s_run
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the deployed front-end

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
