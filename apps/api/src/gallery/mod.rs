// Gallery curation: card storage, validation, listing and the admin surface.

pub mod description;
pub mod handlers;
pub mod memory;
pub mod pagination;
pub mod store;
pub mod validation;

pub use memory::MemoryGalleryStore;
pub use store::{GalleryStore, PgGalleryStore};
