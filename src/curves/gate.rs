//! Decides whether a curve segment is recomputed at draw time
//!
//! Layout runs twice: a measurement pass that sizes everything, then a final
//! pass after justification. Curves are solved in the measurement pass and
//! reused afterwards. Cross-staff curves are the exception: their geometry
//! depends on the vertical distance between staves, which is only final
//! after justification, so they are recomputed on every draw.

use serde::{Deserialize, Serialize};

use crate::models::CurveDirection;

/// What the draw call is expected to do with cached curve geometry
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurveHandling {
    /// Compute undetermined curves
    #[default]
    Initialize,
    /// Draw cached geometry
    Reuse,
}

/// Recalculation predicate for one segment
pub struct RecalculationGate;

impl RecalculationGate {
    pub fn needs_recalculation(
        handling: CurveHandling,
        is_measurement: bool,
        direction: CurveDirection,
        cross_staff: bool,
    ) -> bool {
        if cross_staff {
            return true;
        }
        handling == CurveHandling::Initialize && is_measurement && direction == CurveDirection::Undetermined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_measurement_undetermined_recomputes() {
        assert!(RecalculationGate::needs_recalculation(
            CurveHandling::Initialize,
            true,
            CurveDirection::Undetermined,
            false
        ));
    }

    #[test]
    fn test_determined_single_staff_is_reused() {
        for handling in [CurveHandling::Initialize, CurveHandling::Reuse] {
            for measurement in [true, false] {
                for direction in [CurveDirection::Above, CurveDirection::Below] {
                    assert!(!RecalculationGate::needs_recalculation(handling, measurement, direction, false));
                }
            }
        }
    }

    #[test]
    fn test_reuse_and_final_context_never_initialize() {
        assert!(!RecalculationGate::needs_recalculation(
            CurveHandling::Reuse,
            true,
            CurveDirection::Undetermined,
            false
        ));
        assert!(!RecalculationGate::needs_recalculation(
            CurveHandling::Initialize,
            false,
            CurveDirection::Undetermined,
            false
        ));
    }

    #[test]
    fn test_cross_staff_always_recomputes() {
        for handling in [CurveHandling::Initialize, CurveHandling::Reuse] {
            for measurement in [true, false] {
                for direction in [
                    CurveDirection::Undetermined,
                    CurveDirection::Above,
                    CurveDirection::Below,
                ] {
                    assert!(RecalculationGate::needs_recalculation(handling, measurement, direction, true));
                }
            }
        }
    }
}
