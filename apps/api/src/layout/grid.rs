//! Grid placement for assigned cards.
//!
//! The front-end grid runs on `grid-auto-rows: 8px` with a three-column
//! weight scale, so a card's spans follow directly from its size class and
//! pixel height.

use serde::{Deserialize, Serialize};

use crate::layout::assigner::AssignedCard;
use crate::layout::rules::{CardHeight, SizeClass};

/// Height of one implicit grid row, in pixels.
pub const GRID_ROW_PX: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpan {
    pub column_span: u8,
    pub row_span: u16,
}

impl GridSpan {
    pub fn for_card(size_class: SizeClass, height: CardHeight) -> Self {
        Self {
            column_span: size_class.column_weight(),
            row_span: height.px() / GRID_ROW_PX,
        }
    }
}

impl<T> AssignedCard<T> {
    pub fn grid_span(&self) -> GridSpan {
        GridSpan::for_card(self.size_class, self.height)
    }
}
