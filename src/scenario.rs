//! Scenario files for the `cellreorder` binary.
//!
//! A scenario is a JSON snapshot of one grid page plus a single drag event.
//! Running it builds a [`CellLayout`], asks the solver for a placement, and
//! commits the result so the outcome lists every item's final position.
//!
//! # Example
//!
//! ```json
//! {
//!   "layout": { "count_x": 4, "count_y": 4, "border_space_x": 0, "border_space_y": 0 },
//!   "items": [
//!     { "id": 1, "cell_x": 0, "cell_y": 0, "span_x": 2, "span_y": 2 },
//!     { "id": 2, "cell_x": 3, "cell_y": 3, "span_x": 1, "span_y": 1, "can_reorder": false }
//!   ],
//!   "drag": {
//!     "pixel_x": 200, "pixel_y": 120,
//!     "min_span_x": 2, "min_span_y": 2, "span_x": 2, "span_y": 2
//!   }
//! }
//! ```
//!
//! `layout` falls back to the configuration file when omitted.

use crate::cell::CellAndSpan;
use crate::config::LayoutConfig;
use crate::configuration::{ItemConfiguration, Strategy};
use crate::item::{Item, ItemId};
use crate::layout::{CellLayout, LayoutError};
use crate::reorder::{DragRequest, ReorderAlgorithm};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or running a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// One grid page and one drag over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Overrides the configured layout when present.
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
    #[serde(default)]
    pub items: Vec<Item>,
    pub drag: DragRequest,
}

/// What the drop resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderOutcome {
    /// Where the dragged item lands.  May be smaller than requested.
    pub placement: CellAndSpan,
    /// How displaced items were moved, or `null` if nothing moved.
    pub strategy: Option<Strategy>,
    /// Items that had to move.
    pub intersecting: Vec<ItemId>,
    /// Every item after the drop, dragged item included.
    pub items: Vec<Item>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Solve the drag and commit the chosen placement.
    ///
    /// `Ok(None)` means the drop is rejected: no placement exists and the
    /// grid stays as it was.
    pub fn run(&self, default_layout: &LayoutConfig) -> Result<Option<ReorderOutcome>, ScenarioError> {
        let metrics = self.layout.clone().unwrap_or_else(|| default_layout.clone());
        let mut layout = CellLayout::with_items(metrics, self.items.iter().cloned())?;

        let dragged = self.drag.dragged;
        if let Some(id) = dragged {
            if layout.item(id).is_some() {
                layout.mark_cells_for_item(id, false)?;
            }
        }

        let Some(solution) = ReorderAlgorithm::new(&layout).calculate_reorder(&self.drag) else {
            info!("no placement for drag at ({}, {})", self.drag.pixel_x, self.drag.pixel_y);
            return Ok(None);
        };
        debug!("chose {} via {:?}", solution.placement(), solution.strategy);

        layout.apply_solution(&solution, dragged)?;
        Ok(Some(ReorderOutcome::new(&solution, &layout)))
    }
}

impl ReorderOutcome {
    fn new(solution: &ItemConfiguration, layout: &CellLayout) -> Self {
        Self {
            placement: solution.placement(),
            strategy: solution.strategy,
            intersecting: solution.intersecting.clone(),
            items: layout.items().to_vec(),
        }
    }
}
