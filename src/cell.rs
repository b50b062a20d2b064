//! Cell-space primitives shared by every other module.
//!
//! All coordinates are measured in grid cells and are signed: a push can
//! shift a cluster past the grid edge while a candidate arrangement is being
//! evaluated, and the solver needs to see that to reject it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open rectangle `[left, right) × [top, bottom)` in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CellRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering `span_x × span_y` cells starting at `(cell_x, cell_y)`.
    pub fn from_cell(cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> Self {
        Self::new(cell_x, cell_y, cell_x + span_x, cell_y + span_y)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Whether the two rectangles share at least one cell.
    pub fn intersects(&self, other: &CellRect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Whether `other` lies entirely inside `self`.
    ///
    /// An empty `self` contains nothing.  `other` is not required to be
    /// non-empty, which matters for the vacant-area search where the
    /// "no best yet" sentinel is a degenerate rectangle.
    pub fn contains(&self, other: &CellRect) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &CellRect) -> CellRect {
        CellRect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether the rectangle fits in a `count_x × count_y` grid.
    pub fn within(&self, count_x: i32, count_y: i32) -> bool {
        self.left >= 0 && self.top >= 0 && self.right <= count_x && self.bottom <= count_y
    }
}

/// Position and span of one item inside a candidate arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellAndSpan {
    pub cell_x: i32,
    pub cell_y: i32,
    pub span_x: i32,
    pub span_y: i32,
}

impl CellAndSpan {
    pub fn new(cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> Self {
        Self {
            cell_x,
            cell_y,
            span_x,
            span_y,
        }
    }

    pub fn rect(&self) -> CellRect {
        CellRect::from_cell(self.cell_x, self.cell_y, self.span_x, self.span_y)
    }
}

impl fmt::Display for CellAndSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}: {}x{})",
            self.cell_x, self.cell_y, self.span_x, self.span_y
        )
    }
}

/// Push hint with one sign per axis (`-1`, `0` or `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Direction {
    pub x: i32,
    pub y: i32,
}

impl Direction {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Quantise a delta vector onto the eight compass directions.
    ///
    /// An axis is kept when the angle's projection onto it exceeds one half,
    /// so exact diagonals keep both components.  A zero delta yields `(0, 0)`.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        // `dy / 0.0` is ±inf (angle ±π/2) and `0.0 / 0.0` is NaN, which fails
        // both comparisons below.
        let angle = (dy / dx).atan();
        let x = if angle.cos().abs() > 0.5 { sign(dx) } else { 0 };
        let y = if angle.sin().abs() > 0.5 { sign(dy) } else { 0 };
        Self { x, y }
    }

    pub fn negated(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    /// The same vector with its components swapped.
    pub fn transposed(self) -> Self {
        Self::new(self.y, self.x)
    }

    /// Number of non-zero components.
    pub fn axes(self) -> i32 {
        self.x.abs() + self.y.abs()
    }

    pub fn dot(self, other: Direction) -> i32 {
        self.x * other.x + self.y * other.y
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// The face of a cluster that leads a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    /// Leading edge for a push along `direction`.
    ///
    /// The horizontal component wins when both are set; a zero vector pushes
    /// down.
    pub fn leading(direction: Direction) -> Self {
        if direction.x < 0 {
            Edge::Left
        } else if direction.x > 0 {
            Edge::Right
        } else if direction.y < 0 {
            Edge::Top
        } else {
            Edge::Bottom
        }
    }
}

fn sign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

//  Tests
