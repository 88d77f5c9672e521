use std::sync::Arc;

use crate::config::Config;
use crate::gallery::store::GalleryStore;
use crate::layout::LayoutAssigner;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable item store. Postgres in production, in-memory for dev and tests.
    pub store: Arc<dyn GalleryStore>,
    pub config: Config,
    /// Card layout for the feed; rules come from config.
    pub layout: Arc<LayoutAssigner>,
}

impl AppState {
    pub fn new(store: Arc<dyn GalleryStore>, config: Config) -> anyhow::Result<Self> {
        let layout = Arc::new(LayoutAssigner::new(config.layout_rules.clone())?);
        Ok(Self {
            store,
            config,
            layout,
        })
    }
}
