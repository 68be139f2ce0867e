//! # Life
//!
//! Conway's Game of Life on a bounded grid, as shown alongside the reader.
//!
//! ## Core Components
//!
//! - **grid**: Cell storage and the B3/S23 rules
//! - **simulation**: Run state, stepping and pixel-to-cell mapping
//!
//! ## Design Philosophy
//!
//! - **Bounded**: Cells past the edge count as dead, nothing wraps around
//! - **Headless**: Drawing is left to the caller; `canvas_size` and
//!   `toggle_at_pixel` are all a surface needs

pub mod error;
pub mod grid;
pub mod simulation;

pub use error::*;
pub use grid::*;
pub use simulation::*;
