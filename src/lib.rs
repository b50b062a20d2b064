//! **cellreorder**: the reorder solver of a launcher-style cell grid.
//!
//! Items (icons, folders, widgets) occupy rectangles of cells on a fixed
//! `count_x × count_y` page.  While an item is dragged over the page, the
//! solver works out where it would land and how the items already there
//! must move: pushed aside, moved as a block, or relocated one by one.  If
//! none of that works the dragged item is shrunk, or dropped into the
//! nearest empty space instead.
//!
//! # Architecture
//!
//! The crate is organised around one trait:
//!
//! * [`traits::GridGeometry`]: abstracts pixel-to-cell conversion and the
//!   three displacement strategies so the search in [`reorder`] is not
//!   coupled to any concrete page.
//!
//! [`layout::CellLayout`] is the concrete page; [`scenario`] wires it to
//! the solver for the `cellreorder` binary.

pub mod cell;
mod cluster;
pub mod config;
pub mod configuration;
pub mod item;
pub mod layout;
pub mod occupancy;
pub mod reorder;
pub mod scenario;
pub mod traits;
