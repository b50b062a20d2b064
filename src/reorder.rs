//! The reorder solver.
//!
//! When an item is dragged over a grid page, [`ReorderAlgorithm`] decides
//! where it would land and what happens to the items already there.  Three
//! candidate solutions are computed for every drag position:
//!
//! * **displacement**: the dragged item goes to its nearest cell and the items
//!   in the way are pushed, moved as a block, or moved one by one.  If no
//!   arrangement exists the dragged item is shrunk one cell at a time,
//!   alternating axes, down to its minimum span;
//! * **vacant space**: the dragged item goes to the nearest empty region at
//!   least as large as its minimum span, and nothing else moves;
//! * **in place**: the dragged item goes to its nearest cell only if nothing
//!   else is there.
//!
//! [`choose_solution`] then picks one.  The solver never touches the layout;
//! the caller commits the chosen configuration.

use crate::cell::{CellRect, Direction};
use crate::configuration::{ItemConfiguration, Strategy};
use crate::item::ItemId;
use crate::occupancy::GridOccupancy;
use crate::traits::GridGeometry;
use log::debug;
use serde::{Deserialize, Serialize};

/// One drag-over event, as reported by the drag controller.
///
/// If the dragged item already lives on this page, its cells should be
/// cleared with [`CellLayout::mark_cells_for_item`](crate::layout::CellLayout::mark_cells_for_item)
/// when the drag starts so its own footprint counts as free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragRequest {
    /// Visual centre of the dragged item, in grid pixels.
    pub pixel_x: i32,
    pub pixel_y: i32,
    /// Smallest span the item may be shrunk to.  Must not exceed the span.
    pub min_span_x: i32,
    pub min_span_y: i32,
    /// Requested span.
    pub span_x: i32,
    pub span_y: i32,
    /// Item being dragged, or `None` for an item new to this page.
    #[serde(default)]
    pub dragged: Option<ItemId>,
}

impl DragRequest {
    /// A drag that may not shrink.
    pub fn fixed(pixel_x: i32, pixel_y: i32, span_x: i32, span_y: i32) -> Self {
        Self {
            pixel_x,
            pixel_y,
            min_span_x: span_x,
            min_span_y: span_y,
            span_x,
            span_y,
            dragged: None,
        }
    }

    pub fn with_min_span(mut self, min_span_x: i32, min_span_y: i32) -> Self {
        self.min_span_x = min_span_x;
        self.min_span_y = min_span_y;
        self
    }

    pub fn dragging(mut self, id: ItemId) -> Self {
        self.dragged = Some(id);
        self
    }
}

/// Scratch state owned by a single solver call.
///
/// Reused across the shrink steps of one search and never shared between
/// searches, so no state leaks from one drag event into the next.
#[derive(Debug)]
struct ReorderScratch {
    occupied: GridOccupancy,
}

impl ReorderScratch {
    fn for_layout<G: GridGeometry>(layout: &G) -> Self {
        Self {
            occupied: GridOccupancy::new(layout.count_x(), layout.count_y()),
        }
    }
}

/// Placement search over one grid page.
pub struct ReorderAlgorithm<'a, G: GridGeometry> {
    layout: &'a G,
}

impl<'a, G: GridGeometry> ReorderAlgorithm<'a, G> {
    pub fn new(layout: &'a G) -> Self {
        Self { layout }
    }

    /// Compute the solution to show (or commit) for a drag event.
    ///
    /// Returns `None` when no placement exists; the caller must then leave
    /// the grid unchanged and reject the drop.
    pub fn calculate_reorder(&self, request: &DragRequest) -> Option<ItemConfiguration> {
        let DragRequest {
            pixel_x,
            pixel_y,
            min_span_x,
            min_span_y,
            span_x,
            span_y,
            dragged,
        } = *request;

        let direction = self
            .layout
            .direction_vector_for_drop(pixel_x, pixel_y, span_x, span_y, dragged);

        let in_place = self.drop_in_place_solution(pixel_x, pixel_y, span_x, span_y, dragged);
        let swap = self.find_reorder_solution(request, direction, true);
        let closest = self.closest_empty_space_reorder(
            pixel_x, pixel_y, min_span_x, min_span_y, span_x, span_y,
        );

        debug!(
            "reorder at ({}, {}) span {}x{} dir {}: swap={} (area {}), closest={} (area {}), in_place={}",
            pixel_x,
            pixel_y,
            span_x,
            span_y,
            direction,
            swap.is_solution,
            swap.area(),
            closest.is_solution,
            closest.area(),
            in_place.is_solution
        );
        choose_solution(swap, closest, in_place)
    }

    /// Place the dragged item at its nearest cell, displacing whatever is in
    /// the way and shrinking the item towards its minimum span if needed.
    ///
    /// With `decrease_x_first` the first shrink step reduces the horizontal
    /// span; steps then alternate axes.  Once neither axis can shrink the
    /// returned configuration is not a solution.
    pub fn find_reorder_solution(
        &self,
        request: &DragRequest,
        direction: Direction,
        decrease_x_first: bool,
    ) -> ItemConfiguration {
        let mut solution = ItemConfiguration::new();
        let mut scratch = ReorderScratch::for_layout(self.layout);
        // Nothing wider than the grid or smaller than one cell can ever be
        // placed, so the shrink steps outside that range are skipped.
        let min_x = request.min_span_x.max(1);
        let min_y = request.min_span_y.max(1);
        let mut span_x = request.span_x.min(self.layout.count_x().max(min_x));
        let mut span_y = request.span_y.min(self.layout.count_y().max(min_y));
        let mut decrease_x = decrease_x_first;

        loop {
            self.layout.copy_current_state_to(&mut solution);
            self.layout.occupied().copy_to(&mut scratch.occupied);

            let target = self.layout.find_nearest_area_ignore_occupied(
                request.pixel_x,
                request.pixel_y,
                span_x,
                span_y,
            );
            if let Some((cell_x, cell_y)) = target {
                if self.rearrangement_exists(
                    cell_x,
                    cell_y,
                    span_x,
                    span_y,
                    direction,
                    request.dragged,
                    &mut solution,
                    &mut scratch,
                ) {
                    solution.accept(cell_x, cell_y, span_x, span_y);
                    return solution;
                }
            }

            if span_x > min_x && (min_y == span_y || decrease_x) {
                span_x -= 1;
                decrease_x = false;
            } else if span_y > min_y {
                span_y -= 1;
                decrease_x = true;
            } else {
                solution.is_solution = false;
                return solution;
            }
            debug!("no rearrangement, shrinking to {}x{}", span_x, span_y);
        }
    }

    /// Whether the items under `(cell_x, cell_y, span_x, span_y)` can be
    /// moved out of the way.  On success `solution` holds their new
    /// positions.
    #[allow(clippy::too_many_arguments)]
    fn rearrangement_exists(
        &self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
        direction: Direction,
        dragged: Option<ItemId>,
        solution: &mut ItemConfiguration,
        scratch: &mut ReorderScratch,
    ) -> bool {
        if cell_x < 0 || cell_y < 0 {
            return false;
        }
        let target = CellRect::from_cell(cell_x, cell_y, span_x, span_y);

        if let Some(id) = dragged {
            if let Some(c) = solution.get_mut(id) {
                c.cell_x = cell_x;
                c.cell_y = cell_y;
            }
        }

        let mut intersecting = Vec::new();
        for id in solution.sorted_by_position() {
            if Some(id) == dragged {
                continue;
            }
            let Some(c) = solution.get(id) else {
                continue;
            };
            if c.rect().intersects(&target) {
                if !self.layout.can_reorder(id) {
                    debug!("target {:?} blocked by pinned item {}", target, id);
                    return false;
                }
                intersecting.push(id);
            }
        }
        solution.intersecting.clone_from(&intersecting);
        solution.strategy = None;
        if intersecting.is_empty() {
            return true;
        }

        let layout = self.layout;
        let occupied = &mut scratch.occupied;
        if layout.attempt_push_in_direction(&intersecting, target, direction, dragged, solution, occupied) {
            solution.strategy = Some(Strategy::PushInDirection);
            return true;
        }
        if layout.add_items_to_temp_location(&intersecting, target, direction, dragged, solution, occupied) {
            solution.strategy = Some(Strategy::BlockMove);
            return true;
        }
        for &id in &intersecting {
            if !layout.add_item_to_temp_location(id, target, direction, solution, occupied) {
                return false;
            }
        }
        solution.strategy = Some(Strategy::Individual);
        true
    }

    /// Place the dragged item at its nearest cell without moving anything.
    ///
    /// A solution only if no item other than `dragged` is in the way.
    pub fn drop_in_place_solution(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
        dragged: Option<ItemId>,
    ) -> ItemConfiguration {
        let mut solution = ItemConfiguration::new();
        self.layout.copy_current_state_to(&mut solution);

        let target = self
            .layout
            .find_nearest_area_ignore_occupied(pixel_x, pixel_y, span_x, span_y);
        if let Some((cell_x, cell_y)) = target {
            let region = CellRect::from_cell(cell_x, cell_y, span_x, span_y);
            if !solution.region_occupied(&region, dragged) {
                solution.accept(cell_x, cell_y, span_x, span_y);
            }
        }
        solution
    }

    /// Place the dragged item in the nearest vacant region whose span lies
    /// between the minimum and the requested span.  Nothing moves.
    pub fn closest_empty_space_reorder(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> ItemConfiguration {
        let mut solution = ItemConfiguration::new();
        let area = self.layout.find_nearest_vacant_area(
            pixel_x, pixel_y, min_span_x, min_span_y, span_x, span_y,
        );
        if let Some(area) = area {
            self.layout.copy_current_state_to(&mut solution);
            solution.accept(area.cell_x, area.cell_y, area.span_x, area.span_y);
        }
        solution
    }
}

/// Pick between the three candidate solutions.
///
/// Displacement wins if it keeps at least the area the vacant-space solution
/// offers, so the dragged item is not shrunk just to avoid moving
/// neighbours.  Otherwise vacant space wins over displacement, and in-place
/// is only a last resort; its area is never compared.
pub fn choose_solution(
    swap: ItemConfiguration,
    closest: ItemConfiguration,
    in_place: ItemConfiguration,
) -> Option<ItemConfiguration> {
    if swap.is_solution && swap.area() >= closest.area() {
        Some(swap)
    } else if closest.is_solution {
        Some(closest)
    } else if in_place.is_solution {
        Some(in_place)
    } else {
        None
    }
}

//  Tests
