//! Candidate arrangements of a grid.
//!
//! An [`ItemConfiguration`] is built by copying the layout's current state
//! and is then mutated in place by the solver.  It is either returned to the
//! caller as a solution or dropped.

use crate::cell::{CellAndSpan, CellRect, Edge};
use crate::item::ItemId;
use serde::Serialize;
use std::collections::HashMap;

/// How the items under the dragged item were moved out of the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Slid along the push direction, carrying every item in the way.
    PushInDirection,
    /// Moved together, as one rigid block, to the nearest vacant spot.
    BlockMove,
    /// Each moved to its own nearest vacant spot.
    Individual,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemConfiguration {
    /// Proposed placement of every item on the grid.
    pub map: HashMap<ItemId, CellAndSpan>,
    /// Snapshot taken by [`save`](Self::save).
    saved_map: HashMap<ItemId, CellAndSpan>,
    /// Items displaced to make room for the dragged item, in the
    /// deterministic order they were found.
    pub intersecting: Vec<ItemId>,
    /// Proposed cell of the dragged item.
    pub cell_x: i32,
    pub cell_y: i32,
    /// Proposed span of the dragged item.  May be smaller than requested.
    pub span_x: i32,
    pub span_y: i32,
    pub is_solution: bool,
    /// Strategy that displaced `intersecting`; `None` when nothing moved.
    pub strategy: Option<Strategy>,
}

impl ItemConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Area of the dragged item's proposed placement.
    ///
    /// A fresh or failed configuration has area 0.
    pub fn area(&self) -> i32 {
        self.span_x * self.span_y
    }

    /// Proposed rectangle of the dragged item.
    pub fn placement(&self) -> CellAndSpan {
        CellAndSpan::new(self.cell_x, self.cell_y, self.span_x, self.span_y)
    }

    /// Record the dragged item's final placement and flag the configuration
    /// as a solution.
    pub fn accept(&mut self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) {
        self.cell_x = cell_x;
        self.cell_y = cell_y;
        self.span_x = span_x;
        self.span_y = span_y;
        self.is_solution = true;
    }

    /// Reset to an empty, non-solution state, keeping allocations.
    pub fn clear(&mut self) {
        self.map.clear();
        self.saved_map.clear();
        self.intersecting.clear();
        self.cell_x = 0;
        self.cell_y = 0;
        self.span_x = 0;
        self.span_y = 0;
        self.is_solution = false;
        self.strategy = None;
    }

    pub fn add(&mut self, id: ItemId, cell: CellAndSpan) {
        self.map.insert(id, cell);
    }

    pub fn get(&self, id: ItemId) -> Option<&CellAndSpan> {
        self.map.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut CellAndSpan> {
        self.map.get_mut(&id)
    }

    /// Snapshot the current map so a failed attempt can be rolled back.
    pub fn save(&mut self) {
        self.saved_map.clone_from(&self.map);
    }

    /// Roll the map back to the last [`save`](Self::save).
    pub fn restore(&mut self) {
        self.map.clone_from(&self.saved_map);
    }

    /// Whether any entry other than `ignore` intersects `region`.
    pub fn region_occupied(&self, region: &CellRect, ignore: Option<ItemId>) -> bool {
        self.map
            .iter()
            .filter(|(id, _)| Some(**id) != ignore)
            .any(|(_, c)| c.rect().intersects(region))
    }

    /// Union of the rectangles of `items`, or `None` if none of them is in
    /// the map.
    pub fn bounding_rect_for(&self, items: &[ItemId]) -> Option<CellRect> {
        items
            .iter()
            .filter_map(|id| self.map.get(id))
            .map(CellAndSpan::rect)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Every id ordered by `(cell_x, cell_y)`, then by id.
    ///
    /// Displacement is order sensitive, so this order must not depend on
    /// `HashMap` iteration.
    pub fn sorted_by_position(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.map.keys().copied().collect();
        ids.sort_by_key(|id| {
            let c = &self.map[id];
            (c.cell_x, c.cell_y, *id)
        });
        ids
    }

    /// Every id in the order a cluster leading with `edge` would reach it.
    pub fn sorted_for_edge_push(&self, edge: Edge) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.map.keys().copied().collect();
        ids.sort_by_key(|id| {
            let c = &self.map[id];
            let key = match edge {
                Edge::Left => -(c.cell_x + c.span_x),
                Edge::Right => c.cell_x,
                Edge::Top => -(c.cell_y + c.span_y),
                Edge::Bottom => c.cell_y,
            };
            (key, *id)
        });
        ids
    }

    /// Whether the dragged item's placement and every other entry are
    /// pairwise disjoint.
    ///
    /// `dragged` is left out of the entry set since its map entry may still
    /// carry the span it had before shrinking.
    pub fn is_overlap_free(&self, dragged: Option<ItemId>) -> bool {
        let mut rects: Vec<CellRect> = self
            .map
            .iter()
            .filter(|(id, _)| Some(**id) != dragged)
            .map(|(_, c)| c.rect())
            .collect();
        rects.push(self.placement().rect());
        rects
            .iter()
            .enumerate()
            .all(|(i, a)| rects[i + 1..].iter().all(|b| !a.intersects(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ItemConfiguration {
        let mut c = ItemConfiguration::new();
        c.add(ItemId(1), CellAndSpan::new(2, 0, 1, 1));
        c.add(ItemId(2), CellAndSpan::new(0, 1, 2, 1));
        c.add(ItemId(3), CellAndSpan::new(0, 0, 1, 1));
        c
    }

    #[test]
    fn fresh_configuration_has_zero_area() {
        let c = ItemConfiguration::new();
        assert_eq!(c.area(), 0);
        assert!(!c.is_solution);
    }

    #[test]
    fn accept_sets_placement() {
        let mut c = ItemConfiguration::new();
        c.accept(1, 2, 3, 2);
        assert!(c.is_solution);
        assert_eq!(c.area(), 6);
        assert_eq!(c.placement(), CellAndSpan::new(1, 2, 3, 2));
    }

    #[test]
    fn sorted_by_position_is_x_then_y() {
        let c = config();
        assert_eq!(
            c.sorted_by_position(),
            vec![ItemId(3), ItemId(2), ItemId(1)]
        );
    }

    #[test]
    fn sorted_by_position_breaks_ties_by_id() {
        let mut c = ItemConfiguration::new();
        c.add(ItemId(9), CellAndSpan::new(0, 0, 1, 1));
        c.add(ItemId(4), CellAndSpan::new(0, 0, 1, 1));
        assert_eq!(c.sorted_by_position(), vec![ItemId(4), ItemId(9)]);
    }

    #[test]
    fn sorted_for_left_push_is_right_edge_descending() {
        let c = config();
        // right edges: #1 -> 3, #2 -> 2, #3 -> 1
        assert_eq!(
            c.sorted_for_edge_push(Edge::Left),
            vec![ItemId(1), ItemId(2), ItemId(3)]
        );
    }

    #[test]
    fn sorted_for_bottom_push_is_top_ascending() {
        let c = config();
        // tops: #1 -> 0, #3 -> 0, #2 -> 1
        assert_eq!(
            c.sorted_for_edge_push(Edge::Bottom),
            vec![ItemId(1), ItemId(3), ItemId(2)]
        );
    }

    #[test]
    fn save_and_restore_roll_back_moves() {
        let mut c = config();
        c.save();
        c.get_mut(ItemId(1)).unwrap().cell_x = 5;
        c.restore();
        assert_eq!(c.get(ItemId(1)).unwrap().cell_x, 2);
    }

    #[test]
    fn region_occupied_skips_ignored_item() {
        let c = config();
        let region = CellRect::from_cell(2, 0, 1, 1);
        assert!(c.region_occupied(&region, None));
        assert!(!c.region_occupied(&region, Some(ItemId(1))));
    }

    #[test]
    fn bounding_rect_for_unions_entries() {
        let c = config();
        assert_eq!(
            c.bounding_rect_for(&[ItemId(1), ItemId(2)]),
            Some(CellRect::new(0, 0, 3, 2))
        );
        assert_eq!(c.bounding_rect_for(&[]), None);
    }

    #[test]
    fn overlap_detection_includes_placement() {
        let mut c = config();
        c.accept(1, 0, 1, 1);
        assert!(c.is_overlap_free(None));
        c.accept(0, 0, 1, 1);
        assert!(!c.is_overlap_free(None));
    }

    #[test]
    fn clear_keeps_nothing() {
        let mut c = config();
        c.accept(0, 0, 1, 1);
        c.intersecting.push(ItemId(1));
        c.strategy = Some(Strategy::BlockMove);
        c.clear();
        assert_eq!(c, ItemConfiguration::new());
    }
}
