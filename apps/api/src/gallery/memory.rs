use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gallery::store::GalleryStore;
use crate::gallery::validation::ValidatedItem;
use crate::models::gallery::{CardType, GalleryItem};

/// In-process store for local development (`GALLERY_STORE=memory`) and tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryGalleryStore {
    items: Mutex<Vec<GalleryItem>>,
}

impl MemoryGalleryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply(target: &mut GalleryItem, item: &ValidatedItem) {
    target.title = item.title.clone();
    target.description = item.description.clone();
    target.image = item.image.clone();
    target.additional_images = item.additional_images.clone();
    target.card_type = item.card_type;
    target.regions = item.regions.clone();
    target.builds = item.builds.clone();
    target.youtube_link = item.youtube_link.clone();
    target.discord_link = item.discord_link.clone();
    target.importance = item.importance;
}

#[async_trait]
impl GalleryStore for MemoryGalleryStore {
    async fn list(&self, card_type: Option<CardType>) -> Result<Vec<GalleryItem>, AppError> {
        let items = self.items.lock().await;
        // Newest insertion first so equal timestamps still list newest first.
        let mut out: Vec<GalleryItem> = items
            .iter()
            .rev()
            .filter(|item| card_type.map_or(true, |t| item.card_type == t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> Result<Option<GalleryItem>, AppError> {
        let items = self.items.lock().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn create(&self, author_email: &str, item: &ValidatedItem) -> Result<GalleryItem, AppError> {
        let now = Utc::now();
        let mut created = GalleryItem {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            image: String::new(),
            email: author_email.to_string(),
            additional_images: Vec::new(),
            card_type: item.card_type,
            regions: Vec::new(),
            builds: Vec::new(),
            youtube_link: None,
            discord_link: None,
            importance: item.importance,
            is_spotlight: false,
            spotlight_date: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut created, item);
        self.items.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, item: &ValidatedItem) -> Result<Option<GalleryItem>, AppError> {
        let mut items = self.items.lock().await;
        let Some(existing) = items.iter_mut().find(|existing| existing.id == id) else {
            return Ok(None);
        };
        apply(existing, item);
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }

    async fn toggle_spotlight(&self, id: Uuid) -> Result<Option<GalleryItem>, AppError> {
        let mut items = self.items.lock().await;
        let Some(currently_starred) = items.iter().find(|i| i.id == id).map(|i| i.is_spotlight)
        else {
            return Ok(None);
        };

        if !currently_starred {
            for other in items.iter_mut() {
                other.is_spotlight = false;
            }
        }
        let target = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Gallery item {id} not found")))?;
        target.is_spotlight = !currently_starred;
        if target.is_spotlight {
            target.spotlight_date = Some(Utc::now());
        }
        Ok(Some(target.clone()))
    }

    async fn spotlight(&self) -> Result<Option<GalleryItem>, AppError> {
        let items = self.items.lock().await;
        Ok(items.iter().find(|item| item.is_spotlight).cloned())
    }
}
