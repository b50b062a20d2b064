//! The seam between the reorder solver and the grid it reorders.
//!
//! [`ReorderAlgorithm`](crate::reorder::ReorderAlgorithm) only depends on
//! [`GridGeometry`]: pixel-to-cell conversion, the authoritative occupancy,
//! and the three displacement strategies.  [`CellLayout`](crate::layout::CellLayout)
//! is the concrete implementation; tests substitute recording doubles.

use crate::cell::{CellAndSpan, CellRect, Direction};
use crate::configuration::ItemConfiguration;
use crate::item::ItemId;
use crate::occupancy::GridOccupancy;

/// Geometry and displacement primitives of one grid page.
///
/// Strategy methods receive a scratch [`GridOccupancy`] owned by the current
/// solver call.  On success they update the entries of `solution` in place;
/// on failure the entries they touched are either rolled back or left in a
/// state the solver discards.  Either way the scratch grid must end up
/// marked at every moved item's final cells.
pub trait GridGeometry {
    /// Number of columns.
    fn count_x(&self) -> i32;

    /// Number of rows.
    fn count_y(&self) -> i32;

    /// Authoritative occupancy.  The solver copies it before mutating.
    fn occupied(&self) -> &GridOccupancy;

    /// Whether `item` may be displaced.  Unknown items are immovable.
    fn can_reorder(&self, item: ItemId) -> bool;

    /// Replace the contents of `solution` with an independent copy of every
    /// item's current placement.
    fn copy_current_state_to(&self, solution: &mut ItemConfiguration);

    /// Top-left cell nearest to the pixel point for an item of the given
    /// span, ignoring occupancy.  `None` if the span does not fit the grid.
    fn find_nearest_area_ignore_occupied(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> Option<(i32, i32)>;

    /// Nearest vacant region whose span lies between the minimum and the
    /// requested span.  `None` if not even the minimum fits anywhere.
    fn find_nearest_vacant_area(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> Option<CellAndSpan>;

    /// Direction in which items under the drop target should be pushed.
    fn direction_vector_for_drop(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
        dragged: Option<ItemId>,
    ) -> Direction;

    /// Slide `items` out of `occupied_rect` so that no displaced item passes
    /// through another item without displacing it too.
    fn attempt_push_in_direction(
        &self,
        items: &[ItemId],
        occupied_rect: CellRect,
        direction: Direction,
        dragged: Option<ItemId>,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool;

    /// Move `items` together, as a rigid block, to the nearest vacant spot.
    fn add_items_to_temp_location(
        &self,
        items: &[ItemId],
        occupied_rect: CellRect,
        direction: Direction,
        dragged: Option<ItemId>,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool;

    /// Move a single item to the nearest vacant spot.
    fn add_item_to_temp_location(
        &self,
        item: ItemId,
        occupied_rect: CellRect,
        direction: Direction,
        solution: &mut ItemConfiguration,
        scratch: &mut GridOccupancy,
    ) -> bool;
}
