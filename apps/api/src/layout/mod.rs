// Card layout: size-class and height assignment for the masonry grid.
// Pure and synchronous; each call owns its output and shares no state.

pub mod assigner;
pub mod grid;
pub mod rules;

// Re-export the public API consumed by the feed handler and config.
pub use assigner::{AssignedCard, LayoutAssigner};
pub use grid::GridSpan;
pub use rules::{CardHeight, Importance, LayoutRules, Prominence, SizeClass};
