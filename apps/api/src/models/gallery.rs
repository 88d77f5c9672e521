use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::layout::{Importance, Prominence};

/// Which section of the site a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Showcase,
    Information,
    Gallery,
    Event,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Showcase => "showcase",
            CardType::Information => "information",
            CardType::Gallery => "gallery",
            CardType::Event => "event",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "showcase" => Some(CardType::Showcase),
            "information" => Some(CardType::Information),
            "gallery" => Some(CardType::Gallery),
            "event" => Some(CardType::Event),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryItemRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub email: String,
    pub additional_images: Vec<String>,
    pub card_type: String,
    pub regions: Vec<String>,
    pub builds: Vec<String>,
    pub youtube_link: Option<String>,
    pub discord_link: Option<String>,
    pub importance: String,
    pub is_spotlight: bool,
    pub spotlight_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A curated card as served to the front-end. Field names follow the
/// front-end's camelCase record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub email: String,
    pub additional_images: Vec<String>,
    pub card_type: CardType,
    pub regions: Vec<String>,
    pub builds: Vec<String>,
    pub youtube_link: Option<String>,
    pub discord_link: Option<String>,
    pub importance: Importance,
    pub is_spotlight: bool,
    pub spotlight_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GalleryItemRow> for GalleryItem {
    type Error = anyhow::Error;

    fn try_from(row: GalleryItemRow) -> Result<Self, Self::Error> {
        let card_type = CardType::parse(&row.card_type)
            .ok_or_else(|| anyhow!("item {} has unknown card_type '{}'", row.id, row.card_type))?;
        Ok(GalleryItem {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            email: row.email,
            additional_images: row.additional_images,
            card_type,
            regions: row.regions,
            builds: row.builds,
            youtube_link: row.youtube_link,
            discord_link: row.discord_link,
            importance: Importance::parse_lossy(Some(&row.importance)),
            is_spotlight: row.is_spotlight,
            spotlight_date: row.spotlight_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Prominence for GalleryItem {
    fn importance(&self) -> Importance {
        self.importance
    }
}
