//! Projection of state onto display structures.
//!
//! # Responsibility
//! - Compute the weekly grid and side lists from the current state.
//! - Render the grid as text or SVG.
//!
//! # Invariants
//! - Every projection is a pure function of its input; there is no
//!   incremental update path.
//! - Zoom is carried along for presentation and never changes layout data.

pub mod grid;
pub mod lists;
pub mod svg;
pub mod text;
