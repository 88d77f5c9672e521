//! Gallery item storage — trait-based so handlers don't care where cards live.
//!
//! `AppState` holds an `Arc<dyn GalleryStore>`:
//! - `PgGalleryStore` (production, Postgres via sqlx)
//! - `MemoryGalleryStore` (local development and tests, see `memory.rs`)
//!
//! Listings are always newest first. Spotlight is exclusive: at most one item
//! has `is_spotlight = true`, and un-starring keeps the `spotlight_date`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gallery::validation::ValidatedItem;
use crate::models::gallery::{CardType, GalleryItem, GalleryItemRow};

#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// All items, optionally of one card type, newest first.
    async fn list(&self, card_type: Option<CardType>) -> Result<Vec<GalleryItem>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<GalleryItem>, AppError>;

    async fn create(&self, author_email: &str, item: &ValidatedItem) -> Result<GalleryItem, AppError>;

    /// Replaces the curated content. Author, spotlight state and creation time
    /// are kept. Returns `None` if the item doesn't exist.
    async fn update(&self, id: Uuid, item: &ValidatedItem) -> Result<Option<GalleryItem>, AppError>;

    /// Returns whether an item was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Stars an un-starred item (clearing every other star) or un-stars a
    /// starred one. Returns the updated item, `None` if it doesn't exist.
    async fn toggle_spotlight(&self, id: Uuid) -> Result<Option<GalleryItem>, AppError>;

    /// The currently starred item, if any.
    async fn spotlight(&self) -> Result<Option<GalleryItem>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

/// Advisory lock key serializing spotlight changes across connections.
const SPOTLIGHT_LOCK_KEY: i64 = 0x5370_6f74; // "Spot"

pub struct PgGalleryStore {
    pool: PgPool,
}

impl PgGalleryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_items(rows: Vec<GalleryItemRow>) -> Result<Vec<GalleryItem>, AppError> {
    rows.into_iter()
        .map(|row| GalleryItem::try_from(row).map_err(AppError::from))
        .collect()
}

fn into_item(row: Option<GalleryItemRow>) -> Result<Option<GalleryItem>, AppError> {
    row.map(GalleryItem::try_from)
        .transpose()
        .map_err(AppError::from)
}

#[async_trait]
impl GalleryStore for PgGalleryStore {
    async fn list(&self, card_type: Option<CardType>) -> Result<Vec<GalleryItem>, AppError> {
        let rows: Vec<GalleryItemRow> = match card_type {
            Some(card_type) => {
                sqlx::query_as(
                    "SELECT * FROM gallery_items WHERE card_type = $1 ORDER BY created_at DESC",
                )
                .bind(card_type.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM gallery_items ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        into_items(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<GalleryItem>, AppError> {
        let row: Option<GalleryItemRow> =
            sqlx::query_as("SELECT * FROM gallery_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        into_item(row)
    }

    async fn create(&self, author_email: &str, item: &ValidatedItem) -> Result<GalleryItem, AppError> {
        let row: GalleryItemRow = sqlx::query_as(
            r#"
            INSERT INTO gallery_items
                (id, title, description, image, email, additional_images, card_type,
                 regions, builds, youtube_link, discord_link, importance)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.image)
        .bind(author_email)
        .bind(&item.additional_images)
        .bind(item.card_type.as_str())
        .bind(&item.regions)
        .bind(&item.builds)
        .bind(&item.youtube_link)
        .bind(&item.discord_link)
        .bind(item.importance.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!("Created gallery item {} ({})", row.id, row.card_type);
        Ok(GalleryItem::try_from(row)?)
    }

    async fn update(&self, id: Uuid, item: &ValidatedItem) -> Result<Option<GalleryItem>, AppError> {
        let row: Option<GalleryItemRow> = sqlx::query_as(
            r#"
            UPDATE gallery_items SET
                title = $2, description = $3, image = $4, additional_images = $5,
                card_type = $6, regions = $7, builds = $8, youtube_link = $9,
                discord_link = $10, importance = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.image)
        .bind(&item.additional_images)
        .bind(item.card_type.as_str())
        .bind(&item.regions)
        .bind(&item.builds)
        .bind(&item.youtube_link)
        .bind(&item.discord_link)
        .bind(item.importance.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            info!("Updated gallery item {id}");
        }
        into_item(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted gallery item {id}");
        }
        Ok(deleted)
    }

    async fn toggle_spotlight(&self, id: Uuid) -> Result<Option<GalleryItem>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row locks alone let two toggles on different items both clear and
        // star, which then collides on the single-spotlight index.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SPOTLIGHT_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let current: Option<bool> =
            sqlx::query_scalar("SELECT is_spotlight FROM gallery_items WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(currently_starred) = current else {
            return Ok(None);
        };

        let row: GalleryItemRow = if currently_starred {
            sqlx::query_as(
                "UPDATE gallery_items SET is_spotlight = FALSE WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query(
                "UPDATE gallery_items SET is_spotlight = FALSE WHERE is_spotlight AND id <> $1",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
            sqlx::query_as(
                r#"
                UPDATE gallery_items SET is_spotlight = TRUE, spotlight_date = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        info!(
            "Spotlight {} for gallery item {id}",
            if row.is_spotlight { "set" } else { "removed" }
        );
        into_item(Some(row))
    }

    async fn spotlight(&self) -> Result<Option<GalleryItem>, AppError> {
        let row: Option<GalleryItemRow> = sqlx::query_as(
            "SELECT * FROM gallery_items WHERE is_spotlight ORDER BY spotlight_date DESC NULLS LAST LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        into_item(row)
    }
}
