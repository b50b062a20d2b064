//! Bookkeeping for the push-in-direction strategy.
//!
//! An [`ItemCluster`] is the growing set of items moved together by one push.
//! Before each one-cell shift, every item that some member would run into
//! is absorbed, so the cluster never slides over an item it has not picked
//! up.  Contact is checked member by member rather than against the
//! cluster's outer front, since a member further back in a row can still hit
//! an item the front has already passed.

use crate::cell::{CellRect, Edge};
use crate::configuration::ItemConfiguration;
use crate::item::ItemId;

#[derive(Debug)]
pub(crate) struct ItemCluster {
    items: Vec<ItemId>,
}

impl ItemCluster {
    pub fn new(items: &[ItemId]) -> Self {
        Self {
            items: items.to_vec(),
        }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }

    pub fn add(&mut self, id: ItemId) {
        self.items.push(id);
    }

    pub fn bounding_rect(&self, config: &ItemConfiguration) -> Option<CellRect> {
        config.bounding_rect_for(&self.items)
    }

    /// Move every member one `delta` step towards `edge`.
    pub fn shift(&mut self, config: &mut ItemConfiguration, edge: Edge, delta: i32) {
        for id in &self.items {
            if let Some(c) = config.get_mut(*id) {
                match edge {
                    Edge::Left => c.cell_x -= delta,
                    Edge::Right => c.cell_x += delta,
                    Edge::Top => c.cell_y -= delta,
                    Edge::Bottom => c.cell_y += delta,
                }
            }
        }
    }

    /// Whether the next one-cell shift towards `edge` would move a member
    /// onto `id`.
    pub fn is_touching_edge(&self, config: &ItemConfiguration, id: ItemId, edge: Edge) -> bool {
        let Some(target) = config.get(id).map(|c| c.rect()) else {
            return false;
        };
        let (dx, dy) = match edge {
            Edge::Left => (-1, 0),
            Edge::Right => (1, 0),
            Edge::Top => (0, -1),
            Edge::Bottom => (0, 1),
        };
        self.items
            .iter()
            .filter(|m| **m != id)
            .filter_map(|m| config.get(*m))
            .any(|c| {
                CellRect::from_cell(c.cell_x + dx, c.cell_y + dy, c.span_x, c.span_y)
                    .intersects(&target)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellAndSpan;

    fn config() -> ItemConfiguration {
        let mut c = ItemConfiguration::new();
        c.add(ItemId(1), CellAndSpan::new(1, 0, 1, 2));
        c.add(ItemId(2), CellAndSpan::new(2, 1, 1, 1));
        c.add(ItemId(3), CellAndSpan::new(0, 0, 1, 1));
        c
    }

    #[test]
    fn right_edge_touches_adjacent_item_in_shared_row() {
        let c = config();
        let cluster = ItemCluster::new(&[ItemId(1)]);
        assert!(cluster.is_touching_edge(&c, ItemId(2), Edge::Right));
        assert!(!cluster.is_touching_edge(&c, ItemId(3), Edge::Right));
    }

    #[test]
    fn left_edge_touches_item_on_the_left() {
        let c = config();
        let cluster = ItemCluster::new(&[ItemId(1)]);
        assert!(cluster.is_touching_edge(&c, ItemId(3), Edge::Left));
        assert!(!cluster.is_touching_edge(&c, ItemId(2), Edge::Left));
    }

    #[test]
    fn vertical_edges_use_columns() {
        let mut c = ItemConfiguration::new();
        c.add(ItemId(1), CellAndSpan::new(0, 0, 2, 1));
        c.add(ItemId(2), CellAndSpan::new(1, 1, 1, 1));
        let cluster = ItemCluster::new(&[ItemId(1)]);
        assert!(cluster.is_touching_edge(&c, ItemId(2), Edge::Bottom));
        assert!(!cluster.is_touching_edge(&c, ItemId(2), Edge::Top));
    }

    #[test]
    fn member_behind_the_front_still_touches() {
        // #4 reaches further right in row 0, but #2 in row 1 is the one
        // about to hit #3.
        let mut c = ItemConfiguration::new();
        c.add(ItemId(1), CellAndSpan::new(1, 0, 3, 1));
        c.add(ItemId(2), CellAndSpan::new(1, 1, 1, 1));
        c.add(ItemId(3), CellAndSpan::new(2, 1, 1, 1));
        c.add(ItemId(4), CellAndSpan::new(4, 0, 1, 2));
        let cluster = ItemCluster::new(&[ItemId(1), ItemId(2), ItemId(4)]);
        assert!(cluster.is_touching_edge(&c, ItemId(3), Edge::Right));
    }

    #[test]
    fn shift_moves_members() {
        let mut c = config();
        let mut cluster = ItemCluster::new(&[ItemId(1)]);
        assert!(cluster.is_touching_edge(&c, ItemId(2), Edge::Right));

        cluster.shift(&mut c, Edge::Right, 1);
        assert_eq!(c.get(ItemId(1)).unwrap().cell_x, 2);
        cluster.shift(&mut c, Edge::Right, 1);
        // Past #2 now, so the next step no longer reaches it.
        assert!(!cluster.is_touching_edge(&c, ItemId(2), Edge::Right));
    }

    #[test]
    fn add_extends_bounding_rect() {
        let c = config();
        let mut cluster = ItemCluster::new(&[ItemId(1)]);
        cluster.add(ItemId(2));
        assert!(cluster.contains(ItemId(2)));
        assert_eq!(cluster.bounding_rect(&c), Some(CellRect::new(1, 0, 3, 2)));
    }
}
