use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{is_admin, AdminIdentity, SessionIdentity};
use crate::errors::AppError;
use crate::gallery::description::{split_description, DescriptionSegment};
use crate::gallery::pagination::{page_size_for, paginate, Page};
use crate::gallery::validation::{validate_item, ItemForm};
use crate::layout::{AssignedCard, GridSpan, LayoutAssigner};
use crate::models::gallery::{CardType, GalleryItem};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub card_type: Option<CardType>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub card_type: Option<CardType>,
    pub page: Option<usize>,
    /// Fixes the layout draw so the same page lays out the same way every time.
    pub seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailResponse {
    #[serde(flatten)]
    pub item: GalleryItem,
    pub description_segments: Vec<DescriptionSegment>,
}

#[derive(Debug, Serialize)]
pub struct FeedCard {
    #[serde(flatten)]
    pub card: AssignedCard<GalleryItem>,
    pub grid: GridSpan,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub email: String,
    pub is_admin: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightToggleResponse {
    pub message: &'static str,
    pub item: GalleryItem,
}

/// Lays out one page of the feed. Positions count from the top of the page.
pub fn layout_feed(
    assigner: &LayoutAssigner,
    items: &[GalleryItem],
    seed: Option<u64>,
) -> Vec<FeedCard> {
    let assigned = match seed {
        Some(seed) => assigner.assign_seeded(items, seed),
        None => assigner.assign_fresh(items),
    };
    assigned
        .into_iter()
        .map(|card| {
            let grid = card.grid_span();
            FeedCard { card, grid }
        })
        .collect()
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Gallery item {id} not found"))
}

/// GET /api/v1/items
pub async fn handle_list_items(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<GalleryItem>>, AppError> {
    let items = state.store.list(params.card_type).await?;
    let page = paginate(
        items,
        params.page.unwrap_or(1),
        page_size_for(params.card_type),
    )?;
    Ok(Json(page))
}

/// GET /api/v1/items/:id
pub async fn handle_get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemDetailResponse>, AppError> {
    let item = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    let description_segments = split_description(&item.description);
    Ok(Json(ItemDetailResponse {
        item,
        description_segments,
    }))
}

/// GET /api/v1/feed
pub async fn handle_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<Page<FeedCard>>, AppError> {
    let items = state.store.list(params.card_type).await?;
    let page = paginate(
        items,
        params.page.unwrap_or(1),
        page_size_for(params.card_type),
    )?;
    let cards = layout_feed(&state.layout, &page.items, params.seed);
    Ok(Json(Page {
        items: cards,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        total_pages: page.total_pages,
    }))
}

/// GET /api/v1/spotlight
pub async fn handle_spotlight(
    State(state): State<AppState>,
) -> Result<Json<GalleryItem>, AppError> {
    let item = state
        .store
        .spotlight()
        .await?
        .ok_or_else(|| AppError::NotFound("No item is in the spotlight".into()))?;
    Ok(Json(item))
}

/// GET /api/v1/session
pub async fn handle_session(
    State(state): State<AppState>,
    identity: SessionIdentity,
) -> Json<SessionResponse> {
    let is_admin = is_admin(&state.config.admin_emails, &identity.email);
    Json(SessionResponse {
        email: identity.email,
        is_admin,
    })
}

/// GET /api/v1/admin/items
pub async fn handle_admin_list(
    State(state): State<AppState>,
    _admin: AdminIdentity,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    Ok(Json(state.store.list(None).await?))
}

/// POST /api/v1/admin/items
pub async fn handle_create_item(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Json(form): Json<ItemForm>,
) -> Result<(StatusCode, Json<GalleryItem>), AppError> {
    let validated = validate_item(&form)?;
    let item = state.store.create(&admin.email, &validated).await?;
    info!("{} added gallery item {}", admin.email, item.id);
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/admin/items/:id
pub async fn handle_update_item(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Path(id): Path<Uuid>,
    Json(form): Json<ItemForm>,
) -> Result<Json<GalleryItem>, AppError> {
    let validated = validate_item(&form)?;
    let item = state
        .store
        .update(id, &validated)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!("{} edited gallery item {id}", admin.email);
    Ok(Json(item))
}

/// DELETE /api/v1/admin/items/:id
pub async fn handle_delete_item(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete(id).await? {
        return Err(not_found(id));
    }
    info!("{} deleted gallery item {id}", admin.email);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/items/:id/spotlight
pub async fn handle_toggle_spotlight(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SpotlightToggleResponse>, AppError> {
    let item = state
        .store
        .toggle_spotlight(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let message = if item.is_spotlight {
        "Item set as spotlight!"
    } else {
        "Spotlight removed!"
    };
    info!("{} toggled spotlight on {id}: {}", admin.email, item.is_spotlight);
    Ok(Json(SpotlightToggleResponse { message, item }))
}
