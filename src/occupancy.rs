//! Fixed-size boolean occupancy matrix.
//!
//! [`GridOccupancy`] records which cells of a `count_x × count_y` grid are
//! filled.  It knows nothing about which item fills a cell; callers that need
//! to ignore particular items pass their rectangles as exclusions.
//!
//! Cells outside the grid read as occupied, and marking clips to the grid, so
//! no query or mutation here can panic on out-of-range coordinates.

use crate::cell::{CellAndSpan, CellRect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOccupancy {
    count_x: i32,
    count_y: i32,
    /// Row-major, `count_x * count_y` entries.
    cells: Vec<bool>,
}

impl GridOccupancy {
    /// An empty grid.  Negative dimensions are treated as zero.
    pub fn new(count_x: i32, count_y: i32) -> Self {
        let count_x = count_x.max(0);
        let count_y = count_y.max(0);
        Self {
            count_x,
            count_y,
            cells: vec![false; (count_x * count_y) as usize],
        }
    }

    pub fn count_x(&self) -> i32 {
        self.count_x
    }

    pub fn count_y(&self) -> i32 {
        self.count_y
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.count_x || y >= self.count_y {
            None
        } else {
            Some((y * self.count_x + x) as usize)
        }
    }

    /// Whether `(x, y)` is filled.  Out-of-bounds cells report `true`.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(true, |i| self.cells[i])
    }

    /// Overwrite `other` with this grid's state.
    ///
    /// `other` is resized if its dimensions differ; its allocation is reused
    /// otherwise.
    pub fn copy_to(&self, other: &mut GridOccupancy) {
        other.count_x = self.count_x;
        other.count_y = self.count_y;
        other.cells.clone_from(&self.cells);
    }

    /// Set every in-bounds cell of the region to `value`.
    pub fn mark_cells(&mut self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32, value: bool) {
        let x0 = cell_x.max(0);
        let y0 = cell_y.max(0);
        let x1 = (cell_x + span_x).min(self.count_x);
        let y1 = (cell_y + span_y).min(self.count_y);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y * self.count_x + x) as usize;
                self.cells[i] = value;
            }
        }
    }

    pub fn mark(&mut self, cell: &CellAndSpan, value: bool) {
        self.mark_cells(cell.cell_x, cell.cell_y, cell.span_x, cell.span_y, value);
    }

    pub fn mark_rect(&mut self, rect: &CellRect, value: bool) {
        self.mark_cells(rect.left, rect.top, rect.width(), rect.height(), value);
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Whether every cell of the region lies inside the grid and is empty.
    pub fn is_region_vacant(&self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> bool {
        if !CellRect::from_cell(cell_x, cell_y, span_x, span_y).within(self.count_x, self.count_y) {
            return false;
        }
        (cell_y..cell_y + span_y)
            .all(|y| (cell_x..cell_x + span_x).all(|x| !self.is_occupied(x, y)))
    }

    /// Whether any occupied cell in `rect` lies outside every rectangle in
    /// `excluding`.
    ///
    /// The caller is responsible for `rect` lying inside the grid; cells
    /// beyond the edge count as occupied.
    pub fn region_occupied(&self, rect: &CellRect, excluding: &[CellRect]) -> bool {
        (rect.top..rect.bottom).any(|y| {
            (rect.left..rect.right).any(|x| {
                let cell = CellRect::from_cell(x, y, 1, 1);
                self.is_occupied(x, y) && !excluding.iter().any(|r| r.contains(&cell))
            })
        })
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
