//! Curve layout engine
//!
//! Slurs, ties and phrasing slurs are laid out per segment: the
//! [`RecalculationGate`] decides whether a segment's [`CurvePositioner`] is
//! (re)computed, the [`CurveCalculator`] solves its shape from the elements the
//! [`SpanCollector`] finds under it, and the renderer draws the result.

pub mod bezier;
pub mod calculator;
pub mod gate;
pub mod positioner;
pub mod span_collector;

pub use calculator::{CurveCalculator, CurveSolution};
pub use gate::{CurveHandling, RecalculationGate};
pub use positioner::{CurvePositioner, PositionerArena, PositionerKey};
pub use span_collector::{CurveSide, SpanCollector, SpannedElement};
