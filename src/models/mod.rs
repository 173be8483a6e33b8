//! Models module for the engraving engine
//!
//! This module contains the data handed to the curve engine by the
//! page layout pass: geometry, staves and systems, notation elements and
//! curved elements.

pub mod curve;
pub mod elements;
pub mod geometry;
pub mod score;
pub mod staff;

// Re-export commonly used types
pub use curve::*;
pub use elements::*;
pub use geometry::{CubicBez, Point, Rect, RectDef, Vec2};
pub use score::ScoreLayout;
pub use staff::{Staff, StaffId, System};
