pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::gallery::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public gallery
        .route("/api/v1/items", get(handlers::handle_list_items))
        .route("/api/v1/items/:id", get(handlers::handle_get_item))
        .route("/api/v1/feed", get(handlers::handle_feed))
        .route("/api/v1/spotlight", get(handlers::handle_spotlight))
        .route("/api/v1/session", get(handlers::handle_session))
        // Curation (admin allowlist)
        .route(
            "/api/v1/admin/items",
            get(handlers::handle_admin_list).post(handlers::handle_create_item),
        )
        .route(
            "/api/v1/admin/items/:id",
            put(handlers::handle_update_item).delete(handlers::handle_delete_item),
        )
        .route(
            "/api/v1/admin/items/:id/spotlight",
            post(handlers::handle_toggle_spotlight),
        )
        .with_state(state)
}
