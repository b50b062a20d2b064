//! The concrete grid page.
//!
//! [`CellLayout`] owns the items on one page, their authoritative occupancy,
//! and the pixel metrics used to translate a drag position into cells.  It
//! implements [`GridGeometry`] so the reorder solver can query it and run the
//! displacement strategies against a scratch copy of its occupancy, and it
//! commits the solution the caller finally picks.
//!
//! Pixel coordinates are relative to the top-left corner of the first cell.
//! A drag position is the visual centre of the dragged item.

use crate::cell::{CellAndSpan, CellRect, Direction, Edge};
use crate::cluster::ItemCluster;
use crate::config::LayoutConfig;
use crate::configuration::ItemConfiguration;
use crate::item::{Item, ItemId};
use crate::occupancy::GridOccupancy;
use crate::traits::GridGeometry;
use log::{debug, trace};

/// Errors from building or committing to a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Grid dimensions or cell metrics are unusable.
    #[error("invalid layout metrics: {0}")]
    InvalidMetrics(String),

    /// An item does not fit inside the grid (or has a non-positive span).
    #[error("item {id} at {cell} does not fit a {count_x}x{count_y} grid")]
    OutOfBounds {
        id: ItemId,
        cell: CellAndSpan,
        count_x: i32,
        count_y: i32,
    },

    /// Two items would share a cell.
    #[error("item {id} overlaps item {other}")]
    Overlap { id: ItemId, other: ItemId },

    #[error("item {0} is already on the grid")]
    DuplicateItem(ItemId),

    #[error("no item {0} on the grid")]
    UnknownItem(ItemId),

    /// Only configurations flagged as solutions can be committed.
    #[error("configuration is not a solution")]
    NotASolution,
}

/// Pixel-space rectangle; only used to derive centres.
#[derive(Debug, Clone, Copy)]
struct PixelRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl PixelRect {
    fn center_x(&self) -> i32 {
        ((i64::from(self.left) + i64::from(self.right)) >> 1) as i32
    }

    fn center_y(&self) -> i32 {
        ((i64::from(self.top) + i64::from(self.bottom)) >> 1) as i32
    }
}

/// Squared distance between two points.  Wide enough for any pair of `i32`
/// points.
fn dist_sq(ax: i32, ay: i32, bx: i32, by: i32) -> i128 {
    let dx = i128::from(ax) - i128::from(bx);
    let dy = i128::from(ay) - i128::from(by);
    dx * dx + dy * dy
}

/// One page of the launcher grid.
#[derive(Debug, Clone)]
pub struct CellLayout {
    metrics: LayoutConfig,
    /// Insertion order is kept for stable iteration in logs and output.
    items: Vec<Item>,
    occupied: GridOccupancy,
}

impl CellLayout {
    /// Create an empty layout.
    pub fn new(metrics: LayoutConfig) -> Result<Self, LayoutError> {
        if metrics.count_x < 1 || metrics.count_y < 1 {
            return Err(LayoutError::InvalidMetrics(format!(
                "grid must be at least 1x1, got {}x{}",
                metrics.count_x, metrics.count_y
            )));
        }
        if metrics.cell_width < 1 || metrics.cell_height < 1 {
            return Err(LayoutError::InvalidMetrics(format!(
                "cells must be at least 1px, got {}x{}",
                metrics.cell_width, metrics.cell_height
            )));
        }
        if metrics.border_space_x < 0 || metrics.border_space_y < 0 {
            return Err(LayoutError::InvalidMetrics(
                "border space must not be negative".into(),
            ));
        }
        let extent = |count: i32, cell: i32, border: i32| {
            cell.checked_add(border).and_then(|step| step.checked_mul(count))
        };
        if extent(metrics.count_x, metrics.cell_width, metrics.border_space_x).is_none()
            || extent(metrics.count_y, metrics.cell_height, metrics.border_space_y).is_none()
        {
            return Err(LayoutError::InvalidMetrics(
                "grid does not fit in pixel coordinates".into(),
            ));
        }
        let occupied = GridOccupancy::new(metrics.count_x, metrics.count_y);
        Ok(Self {
            metrics,
            items: Vec::new(),
            occupied,
        })
    }

    /// Create a layout and add every item in order.
    pub fn with_items(
        metrics: LayoutConfig,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Self, LayoutError> {
        let mut layout = Self::new(metrics)?;
        for item in items {
            layout.add_item(item)?;
        }
        Ok(layout)
    }

    //  Accessors

    pub fn metrics(&self) -> &LayoutConfig {
        &self.metrics
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    //  Mutation

    /// Place a new item.  Fails if it leaves the grid, reuses an id, or
    /// overlaps an existing item.
    pub fn add_item(&mut self, item: Item) -> Result<(), LayoutError> {
        if self.item(item.id).is_some() {
            return Err(LayoutError::DuplicateItem(item.id));
        }
        self.check_bounds(&item)?;
        if let Some(other) = self.items.iter().find(|o| o.rect().intersects(&item.rect())) {
            return Err(LayoutError::Overlap {
                id: item.id,
                other: other.id,
            });
        }
        self.occupied.mark(&item.cell, true);
        self.items.push(item);
        Ok(())
    }

    /// Take an item off the grid.
    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, LayoutError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(LayoutError::UnknownItem(id))?;
        let item = self.items.remove(index);
        self.occupied.mark(&item.cell, false);
        Ok(item)
    }

    /// Set or clear the occupancy of an item's cells without moving it.
    ///
    /// Callers clear the dragged item's cells when a drag starts so that its
    /// own footprint is available to the solver, and set them again if the
    /// drag is cancelled.
    pub fn mark_cells_for_item(&mut self, id: ItemId, value: bool) -> Result<(), LayoutError> {
        let cell = self.item(id).ok_or(LayoutError::UnknownItem(id))?.cell;
        self.occupied.mark(&cell, value);
        Ok(())
    }

    /// Commit a solution.
    ///
    /// Every item takes the position recorded in `solution.map`.  The dragged
    /// item takes the solution's placement, including a shrunken span; if it
    /// is not on this page yet it is added as a movable item.  Occupancy is
    /// rebuilt from scratch afterwards, so any cells cleared with
    /// [`mark_cells_for_item`](Self::mark_cells_for_item) are restored.
    ///
    /// The layout is left untouched if the result would be invalid.
    pub fn apply_solution(
        &mut self,
        solution: &ItemConfiguration,
        dragged: Option<ItemId>,
    ) -> Result<(), LayoutError> {
        if !solution.is_solution {
            return Err(LayoutError::NotASolution);
        }

        let mut next = self.items.clone();
        for item in next.iter_mut() {
            if Some(item.id) == dragged {
                item.cell = solution.placement();
            } else if let Some(c) = solution.get(item.id) {
                item.cell = *c;
            }
        }
        if let Some(id) = dragged {
            if !next.iter().any(|i| i.id == id) {
                next.push(Item {
                    id,
                    cell: solution.placement(),
                    can_reorder: true,
                });
            }
        }

        for item in &next {
            self.check_bounds(item)?;
        }
        for (i, a) in next.iter().enumerate() {
            if let Some(b) = next[i + 1..].iter().find(|b| a.rect().intersects(&b.rect())) {
                return Err(LayoutError::Overlap { id: a.id, other: b.id });
            }
        }

        debug!(
            "committing placement {} with {} displaced item(s)",
            solution.placement(),
            solution.intersecting.len()
        );
        self.items = next;
        self.rebuild_occupancy();
        Ok(())
    }

    fn rebuild_occupancy(&mut self) {
        self.occupied.clear();
        for item in &self.items {
            self.occupied.mark(&item.cell, true);
        }
    }

    fn check_bounds(&self, item: &Item) -> Result<(), LayoutError> {
        let c = item.cell;
        let (count_x, count_y) = (self.metrics.count_x, self.metrics.count_y);
        // Compared without adding cell and span, which may overflow.
        let fits = c.cell_x >= 0
            && c.cell_y >= 0
            && c.span_x >= 1
            && c.span_y >= 1
            && c.span_x <= count_x - c.cell_x
            && c.span_y <= count_y - c.cell_y;
        if !fits {
            return Err(LayoutError::OutOfBounds {
                id: item.id,
                cell: c,
                count_x: self.metrics.count_x,
                count_y: self.metrics.count_y,
            });
        }
        Ok(())
    }

    //  Pixel geometry

    /// Top-left pixel of a cell.
    pub fn cell_to_point(&self, cell_x: i32, cell_y: i32) -> (i32, i32) {
        let m = &self.metrics;
        (
            cell_x * (m.cell_width + m.border_space_x),
            cell_y * (m.cell_height + m.border_space_y),
        )
    }

    /// Centre pixel of a single cell.
    pub fn cell_to_center_point(&self, cell_x: i32, cell_y: i32) -> (i32, i32) {
        let (x, y) = self.cell_to_point(cell_x, cell_y);
        (x + self.metrics.cell_width / 2, y + self.metrics.cell_height / 2)
    }

    /// Centre pixel of a `span_x × span_y` region; this is where the visual
    /// centre of a dragged item sits when it hovers exactly over the region.
    pub fn region_to_center_point(&self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> (i32, i32) {
        let r = self.cell_to_rect(cell_x, cell_y, span_x, span_y);
        (r.center_x(), r.center_y())
    }

    fn cell_to_rect(&self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> PixelRect {
        let m = &self.metrics;
        let (left, top) = self.cell_to_point(cell_x, cell_y);
        let width = span_x * m.cell_width + (span_x - 1) * m.border_space_x;
        let height = span_y * m.cell_height + (span_y - 1) * m.border_space_y;
        PixelRect {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Translate an item-centre pixel to the centre of its top-left cell.
    fn top_left_reference(&self, pixel_x: i32, pixel_y: i32, span_x: i32, span_y: i32) -> (i32, i32) {
        let m = &self.metrics;
        let x = pixel_x as f32 - (m.cell_width + m.border_space_x) as f32 * (span_x - 1) as f32 / 2.0;
        let y = pixel_y as f32 - (m.cell_height + m.border_space_y) as f32 * (span_y - 1) as f32 / 2.0;
        (x as i32, y as i32)
    }

    /// Items other than `ignore` whose current rect intersects `region`,
    /// plus the union of `region` with all of them.
    fn items_intersecting_region(&self, region: CellRect, ignore: Option<ItemId>) -> (Vec<ItemId>, CellRect) {
        let mut bounds = region;
        let mut hits = Vec::new();
        for item in self.items.iter().filter(|i| Some(i.id) != ignore) {
            let r = item.rect();
            if r.intersects(&region) {
                hits.push(item.id);
                bounds = bounds.union(&r);
            }
        }
        (hits, bounds)
    }

    //  Cell search

    /// Nearest position for a `span_x × span_y` footprint starting from cell
    /// `(cell_x, cell_y)`, measured in cells.
    ///
    /// A position is free when none of its cells are occupied; with a
    /// `block` mask only the cells the mask marks need to be free.  Ties on
    /// distance go to the candidate best aligned with `direction`.
    #[allow(clippy::too_many_arguments)]
    fn find_nearest_area(
        &self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
        direction: Direction,
        occupied: &GridOccupancy,
        block: Option<&GridOccupancy>,
    ) -> Option<(i32, i32)> {
        let mut best = None;
        let mut best_distance = i128::MAX;
        let mut best_score = i32::MIN;

        for y in 0..self.metrics.count_y - (span_y - 1) {
            for x in 0..self.metrics.count_x - (span_x - 1) {
                let blocked = (0..span_x).any(|i| {
                    (0..span_y).any(|j| {
                        occupied.is_occupied(x + i, y + j)
                            && block.map_or(true, |b| b.is_occupied(i, j))
                    })
                });
                if blocked {
                    continue;
                }
                let distance = dist_sq(x, y, cell_x, cell_y);
                let heading = Direction::from_delta((x - cell_x) as f64, (y - cell_y) as f64);
                let score = direction.dot(heading);
                if distance < best_distance || (distance == best_distance && score > best_score) {
                    best = Some((x, y));
                    best_distance = distance;
                    best_score = score;
                }
            }
        }
        best
    }

    /// One push attempt along a single direction.
    fn push_items_to_temp_location(
        &self,
        items: &[ItemId],
        occupied_rect: CellRect,
        direction: Direction,
        dragged: Option<ItemId>,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool {
        let mut cluster = ItemCluster::new(items);
        let Some(cluster_rect) = cluster.bounding_rect(solution) else {
            return false;
        };

        let edge = Edge::leading(direction);
        let mut push_distance = match edge {
            Edge::Left => cluster_rect.right - occupied_rect.left,
            Edge::Right => occupied_rect.right - cluster_rect.left,
            Edge::Top => cluster_rect.bottom - occupied_rect.top,
            Edge::Bottom => occupied_rect.bottom - cluster_rect.top,
        };
        if push_distance <= 0 {
            return false;
        }

        for c in items.iter().filter_map(|id| solution.get(*id)) {
            scratch.mark(c, false);
        }
        solution.save();

        // Items are visited in the order the leading edge meets them, and a
        // step repeats the pass until nothing new is absorbed, so chains of
        // contacts are picked up before the cluster moves.
        let order = solution.sorted_for_edge_push(edge);
        let mut fail = false;
        while push_distance > 0 && !fail {
            let mut absorbed = true;
            while absorbed && !fail {
                absorbed = false;
                for &id in &order {
                    if cluster.contains(id) || Some(id) == dragged {
                        continue;
                    }
                    if cluster.is_touching_edge(solution, id, edge) {
                        if !self.can_reorder(id) {
                            trace!("push {:?} blocked by pinned item {}", edge, id);
                            fail = true;
                            break;
                        }
                        cluster.add(id);
                        absorbed = true;
                        if let Some(c) = solution.get(id) {
                            scratch.mark(c, false);
                        }
                    }
                }
            }
            if fail {
                break;
            }
            push_distance -= 1;
            cluster.shift(solution, edge, 1);
        }

        let found = !fail
            && cluster
                .bounding_rect(solution)
                .is_some_and(|r| r.within(self.metrics.count_x, self.metrics.count_y));
        if !found {
            solution.restore();
        }
        for c in cluster.items().iter().filter_map(|id| solution.get(*id)) {
            scratch.mark(c, true);
        }
        trace!(
            "push {:?} moving {} item(s): {}",
            edge,
            cluster.items().len(),
            if found { "ok" } else { "failed" }
        );
        found
    }
}

impl GridGeometry for CellLayout {
    fn count_x(&self) -> i32 {
        self.metrics.count_x
    }

    fn count_y(&self) -> i32 {
        self.metrics.count_y
    }

    fn occupied(&self) -> &GridOccupancy {
        &self.occupied
    }

    fn can_reorder(&self, item: ItemId) -> bool {
        self.item(item).is_some_and(|i| i.can_reorder)
    }

    fn copy_current_state_to(&self, solution: &mut ItemConfiguration) {
        solution.clear();
        for item in &self.items {
            solution.add(item.id, item.cell);
        }
    }

    fn find_nearest_area_ignore_occupied(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> Option<(i32, i32)> {
        let (count_x, count_y) = (self.metrics.count_x, self.metrics.count_y);
        if span_x < 1 || span_y < 1 || span_x > count_x || span_y > count_y {
            return None;
        }
        let (px, py) = self.top_left_reference(pixel_x, pixel_y, span_x, span_y);

        let mut best = None;
        let mut best_distance = i128::MAX;
        for y in 0..=count_y - span_y {
            for x in 0..=count_x - span_x {
                let (cx, cy) = self.cell_to_center_point(x, y);
                let distance = dist_sq(cx, cy, px, py);
                if distance <= best_distance {
                    best = Some((x, y));
                    best_distance = distance;
                }
            }
        }
        best
    }

    fn find_nearest_vacant_area(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> Option<CellAndSpan> {
        if min_span_x < 1 || min_span_y < 1 || span_x < min_span_x || span_y < min_span_y {
            return None;
        }
        let (count_x, count_y) = (self.metrics.count_x, self.metrics.count_y);
        let (px, py) = self.top_left_reference(pixel_x, pixel_y, span_x, span_y);
        let occupied = &self.occupied;

        let mut best: Option<CellAndSpan> = None;
        let mut best_distance = i128::MAX;
        let mut best_rect = CellRect::new(-1, -1, -1, -1);
        let mut valid_regions: Vec<CellRect> = Vec::new();

        for y in 0..count_y - (min_span_y - 1) {
            for x in 0..count_x - (min_span_x - 1) {
                if !occupied.is_region_vacant(x, y, min_span_x, min_span_y) {
                    continue;
                }

                // The minimum fits here; grow alternately in x and y until
                // both reach the requested span or hit something.
                let (mut size_x, mut size_y) = (min_span_x, min_span_y);
                let mut hit_max_x = size_x >= span_x;
                let mut hit_max_y = size_y >= span_y;
                let mut inc_x = true;
                while !(hit_max_x && hit_max_y) {
                    if inc_x && !hit_max_x {
                        hit_max_x = (0..size_y).any(|j| occupied.is_occupied(x + size_x, y + j));
                        if !hit_max_x {
                            size_x += 1;
                        }
                    } else if !hit_max_y {
                        hit_max_y = (0..size_x).any(|i| occupied.is_occupied(x + i, y + size_y));
                        if !hit_max_y {
                            size_y += 1;
                        }
                    }
                    hit_max_x |= size_x >= span_x;
                    hit_max_y |= size_y >= span_y;
                    inc_x = !inc_x;
                }

                let current = CellRect::from_cell(x, y, size_x, size_y);
                // A region inside an earlier candidate is never better than
                // that candidate.
                let contained = valid_regions.iter().any(|r| r.contains(&current));
                valid_regions.push(current);

                let (cx, cy) = self.cell_to_center_point(x, y);
                let distance = dist_sq(cx, cy, px, py);
                if (distance <= best_distance && !contained) || current.contains(&best_rect) {
                    best = Some(CellAndSpan::new(x, y, size_x, size_y));
                    best_distance = distance;
                    best_rect = current;
                }
            }
        }
        best
    }

    fn direction_vector_for_drop(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
        dragged: Option<ItemId>,
    ) -> Direction {
        let Some((target_x, target_y)) =
            self.find_nearest_area_ignore_occupied(pixel_x, pixel_y, span_x, span_y)
        else {
            return Direction::new(1, 0);
        };

        let target = CellRect::from_cell(target_x, target_y, span_x, span_y);
        let (_, region) = self.items_intersecting_region(target, dragged);
        let region_px = self.cell_to_rect(region.left, region.top, region.width(), region.height());

        let mut delta_x = (i64::from(region_px.center_x()) - i64::from(pixel_x)) / i64::from(span_x);
        let mut delta_y = (i64::from(region_px.center_y()) - i64::from(pixel_y)) / i64::from(span_y);
        if region.width() == self.metrics.count_x || span_x == self.metrics.count_x {
            delta_x = 0;
        }
        if region.height() == self.metrics.count_y || span_y == self.metrics.count_y {
            delta_y = 0;
        }

        if delta_x == 0 && delta_y == 0 {
            Direction::new(1, 0)
        } else {
            Direction::from_delta(delta_x as f64, delta_y as f64)
        }
    }

    fn attempt_push_in_direction(
        &self,
        items: &[ItemId],
        occupied_rect: CellRect,
        direction: Direction,
        dragged: Option<ItemId>,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool {
        if items.is_empty() {
            return true;
        }
        // A diagonal hint is tried one axis at a time, then reversed.  A
        // straight hint is tried as given, reversed, and then on the
        // perpendicular axis both ways.
        let attempts = if direction.axes() > 1 {
            [
                Direction::new(direction.x, 0),
                Direction::new(0, direction.y),
                Direction::new(-direction.x, 0),
                Direction::new(0, -direction.y),
            ]
        } else {
            [
                direction,
                direction.negated(),
                direction.transposed(),
                direction.transposed().negated(),
            ]
        };
        attempts.into_iter().any(|d| {
            self.push_items_to_temp_location(items, occupied_rect, d, dragged, solution, scratch)
        })
    }

    fn add_items_to_temp_location(
        &self,
        items: &[ItemId],
        occupied_rect: CellRect,
        direction: Direction,
        _dragged: Option<ItemId>,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool {
        if items.is_empty() {
            return true;
        }
        let Some(bounds) = solution.bounding_rect_for(items) else {
            return false;
        };

        // Mask of the cells the block really covers, so non-rectangular
        // groups can slot around other items.
        let mut block = GridOccupancy::new(bounds.width(), bounds.height());
        for c in items.iter().filter_map(|id| solution.get(*id)) {
            scratch.mark(c, false);
            block.mark_cells(c.cell_x - bounds.left, c.cell_y - bounds.top, c.span_x, c.span_y, true);
        }
        scratch.mark_rect(&occupied_rect, true);

        let target = self.find_nearest_area(
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height(),
            direction,
            scratch,
            Some(&block),
        );
        if let Some((x, y)) = target {
            let (dx, dy) = (x - bounds.left, y - bounds.top);
            for id in items {
                if let Some(c) = solution.get_mut(*id) {
                    c.cell_x += dx;
                    c.cell_y += dy;
                }
            }
        }

        for c in items.iter().filter_map(|id| solution.get(*id)) {
            scratch.mark(c, true);
        }
        debug!(
            "block move of {} item(s) from ({}, {}): {}",
            items.len(),
            bounds.left,
            bounds.top,
            if target.is_some() { "ok" } else { "no room" }
        );
        target.is_some()
    }

    fn add_item_to_temp_location(
        &self,
        item: ItemId,
        occupied_rect: CellRect,
        direction: Direction,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool {
        let Some(mut c) = solution.get(item).copied() else {
            return false;
        };
        scratch.mark(&c, false);
        scratch.mark_rect(&occupied_rect, true);

        let target = self.find_nearest_area(
            c.cell_x, c.cell_y, c.span_x, c.span_y, direction, scratch, None,
        );
        if let Some((x, y)) = target {
            c.cell_x = x;
            c.cell_y = y;
            solution.add(item, c);
        }
        scratch.mark(&c, true);
        target.is_some()
    }
}

//  Tests
