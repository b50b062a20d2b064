//! Items placed on the grid.

use crate::cell::{CellAndSpan, CellRect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an item.
///
/// Two items with identical geometry are still distinct; every map in the
/// crate is keyed by this handle, never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An icon, folder or widget occupying a rectangle of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub cell: CellAndSpan,
    /// Whether other items may displace this one.  Immovable items act as
    /// hard blockers for every displacement strategy.
    #[serde(default = "default_can_reorder")]
    pub can_reorder: bool,
}

fn default_can_reorder() -> bool {
    true
}

impl Item {
    /// A movable item.
    pub fn new(id: u32, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> Self {
        Self {
            id: ItemId(id),
            cell: CellAndSpan::new(cell_x, cell_y, span_x, span_y),
            can_reorder: true,
        }
    }

    /// Mark this item as immovable.
    pub fn pinned(mut self) -> Self {
        self.can_reorder = false;
        self
    }

    pub fn rect(&self) -> CellRect {
        self.cell.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_flattened_cell() {
        let json = r#"{ "id": 7, "cell_x": 1, "cell_y": 2, "span_x": 2, "span_y": 1 }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.cell, CellAndSpan::new(1, 2, 2, 1));
        assert!(item.can_reorder, "items are movable unless stated otherwise");
    }

    #[test]
    fn deserialize_pinned_item() {
        let json = r#"{ "id": 1, "cell_x": 0, "cell_y": 0, "span_x": 1, "span_y": 1, "can_reorder": false }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(!item.can_reorder);
    }

    #[test]
    fn pinned_clears_flag() {
        let item = Item::new(3, 0, 0, 1, 1).pinned();
        assert!(!item.can_reorder);
        assert_eq!(item.rect(), CellRect::new(0, 0, 1, 1));
    }
}
