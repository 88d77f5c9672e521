use serde::Serialize;

use crate::errors::AppError;
use crate::models::gallery::CardType;

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const EVENT_PAGE_SIZE: usize = 10;

/// Events get a shorter page; every other listing shows 12 cards.
pub fn page_size_for(card_type: Option<CardType>) -> usize {
    match card_type {
        Some(CardType::Event) => EVENT_PAGE_SIZE,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// One 1-based page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slices `items` to the requested page. A page past the end is empty, not an
/// error; page 0 is rejected.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Result<Page<T>, AppError> {
    if page == 0 {
        return Err(AppError::Validation("page numbers start at 1".into()));
    }
    if per_page == 0 {
        return Err(AppError::Validation("page size must be at least 1".into()));
    }

    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page);
    let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();

    Ok(Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    })
}
