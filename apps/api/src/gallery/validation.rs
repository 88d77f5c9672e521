//! Curator form validation — turns a raw create/edit payload into a clean item.
//!
//! Rules:
//! - title, description and main image are required (non-blank after trim)
//! - additional images: trimmed, blanks dropped, at most 8 remain
//! - region and build chips must come from the fixed option lists; duplicates
//!   collapse to the first occurrence
//! - YouTube / Discord links are optional; when present they must be http(s) URLs

use serde::Deserialize;

use crate::errors::AppError;
use crate::layout::Importance;
use crate::models::gallery::CardType;

pub const MAX_ADDITIONAL_IMAGES: usize = 8;

pub const REGION_OPTIONS: &[&str] = &[
    "North America",
    "Europe",
    "South America",
    "Southeast Asia",
    "Other Regions",
    "Custom Server",
];

pub const BUILD_OPTIONS: &[&str] = &[
    "Showcase",
    "Base Design",
    "Room Design",
    "City Build",
    "Tutorial",
    "Outfit",
    "Character",
    "Decoration",
    "Bug",
    "Weapon Build",
    "Deviation",
    "Update",
    "Class",
];

/// Raw create/edit payload from the admin panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    pub title: String,
    pub description: String,
    #[serde(alias = "imageUrl")]
    pub image: String,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default = "default_card_type")]
    pub card_type: CardType,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub builds: Vec<String>,
    #[serde(default)]
    pub youtube_link: Option<String>,
    #[serde(default)]
    pub discord_link: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
}

fn default_card_type() -> CardType {
    CardType::Showcase
}

/// A form that passed validation. Everything the store persists for the
/// curated content of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedItem {
    pub title: String,
    pub description: String,
    pub image: String,
    pub additional_images: Vec<String>,
    pub card_type: CardType,
    pub regions: Vec<String>,
    pub builds: Vec<String>,
    pub youtube_link: Option<String>,
    pub discord_link: Option<String>,
    pub importance: Importance,
}

pub fn validate_item(form: &ItemForm) -> Result<ValidatedItem, AppError> {
    let title = required(&form.title, "title")?;
    let description = required(&form.description, "description")?;
    let image = required(&form.image, "image")?;

    let additional_images: Vec<String> = form
        .additional_images
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();
    if additional_images.len() > MAX_ADDITIONAL_IMAGES {
        return Err(AppError::Validation(format!(
            "at most {MAX_ADDITIONAL_IMAGES} additional images are allowed, got {}",
            additional_images.len()
        )));
    }

    Ok(ValidatedItem {
        title,
        description,
        image,
        additional_images,
        card_type: form.card_type,
        regions: chips(&form.regions, REGION_OPTIONS, "region")?,
        builds: chips(&form.builds, BUILD_OPTIONS, "build")?,
        youtube_link: optional_link(form.youtube_link.as_deref(), "youtubeLink")?,
        discord_link: optional_link(form.discord_link.as_deref(), "discordLink")?,
        importance: Importance::parse_lossy(form.importance.as_deref()),
    })
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn chips(selected: &[String], options: &[&str], kind: &str) -> Result<Vec<String>, AppError> {
    let mut out: Vec<String> = Vec::with_capacity(selected.len());
    for label in selected {
        let label = label.trim();
        if !options.contains(&label) {
            return Err(AppError::Validation(format!("unknown {kind} '{label}'")));
        }
        if !out.iter().any(|existing| existing == label) {
            out.push(label.to_string());
        }
    }
    Ok(out)
}

fn optional_link(raw: Option<&str>, field: &str) -> Result<Option<String>, AppError> {
    let Some(link) = raw.map(str::trim).filter(|l| !l.is_empty()) else {
        return Ok(None);
    };
    if !(link.starts_with("https://") || link.starts_with("http://")) {
        return Err(AppError::Validation(format!(
            "{field} must be an http(s) URL"
        )));
    }
    Ok(Some(link.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ItemForm {
        ItemForm {
            title: "  Lakeside Manor ".into(),
            description: "Two-storey build".into(),
            image: "https://img.example/manor.png".into(),
            additional_images: vec![],
            card_type: CardType::Showcase,
            regions: vec![],
            builds: vec![],
            youtube_link: None,
            discord_link: None,
            importance: None,
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let item = validate_item(&form()).unwrap();
        assert_eq!(item.title, "Lakeside Manor");
        assert_eq!(item.importance, Importance::Normal);
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["title", "description", "image"] {
            let mut f = form();
            match field {
                "title" => f.title = "   ".into(),
                "description" => f.description = String::new(),
                _ => f.image = String::new(),
            }
            match validate_item(&f) {
                Err(AppError::Validation(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_additional_images_blank_entries_dropped() {
        let mut f = form();
        f.additional_images = vec!["".into(), " https://a ".into(), "  ".into(), "https://b".into()];
        let item = validate_item(&f).unwrap();
        assert_eq!(item.additional_images, vec!["https://a", "https://b"]);
    }

    #[test]
    fn test_too_many_additional_images() {
        let mut f = form();
        f.additional_images = (0..9).map(|i| format!("https://img/{i}")).collect();
        assert!(matches!(validate_item(&f), Err(AppError::Validation(_))));

        // Blanks don't count toward the limit.
        f.additional_images.truncate(8);
        f.additional_images.push(String::new());
        assert!(validate_item(&f).is_ok());
    }

    #[test]
    fn test_chips_checked_and_deduplicated() {
        let mut f = form();
        f.regions = vec!["Europe".into(), "Custom Server".into(), "Europe".into()];
        f.builds = vec!["Tutorial".into()];
        let item = validate_item(&f).unwrap();
        assert_eq!(item.regions, vec!["Europe", "Custom Server"]);

        f.builds = vec!["Spaceship".into()];
        assert!(matches!(validate_item(&f), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_links() {
        let mut f = form();
        f.youtube_link = Some("  ".into());
        f.discord_link = Some("https://discord.gg/abc".into());
        let item = validate_item(&f).unwrap();
        assert_eq!(item.youtube_link, None);
        assert_eq!(item.discord_link.as_deref(), Some("https://discord.gg/abc"));

        f.youtube_link = Some("javascript:alert(1)".into());
        assert!(matches!(validate_item(&f), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_form_accepts_front_end_field_names() {
        let f: ItemForm = serde_json::from_value(serde_json::json!({
            "title": "t",
            "description": "d",
            "imageUrl": "https://img",
            "cardType": "event",
            "importance": "hero"
        }))
        .unwrap();
        let item = validate_item(&f).unwrap();
        assert_eq!(item.card_type, CardType::Event);
        assert_eq!(item.importance, Importance::Hero);
    }
}
