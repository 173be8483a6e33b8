//! Laid-out score: the input handed to the curve engine
//!
//! A `ScoreLayout` is what the page layout pass produces: systems with their
//! staves, every notation element with its bounding box, and the curved
//! elements whose segments still have to be positioned and drawn.

use serde::{Deserialize, Serialize};

use super::curve::{CurveSegment, CurvedElement, SpanningType};
use super::elements::{ElementId, NotationElement};
use super::staff::{Staff, StaffId, System};
use crate::errors::CurveError;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ScoreLayout {
    pub systems: Vec<System>,
    #[serde(default)]
    pub elements: Vec<NotationElement>,
    #[serde(default)]
    pub curves: Vec<CurvedElement>,
}

impl ScoreLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staff(&self, system: usize, id: &StaffId) -> Option<&Staff> {
        self.systems.get(system)?.staff(id)
    }

    pub fn element(&self, id: &ElementId) -> Option<&NotationElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Elements laid out on one staff of one system
    pub fn elements_on<'a>(
        &'a self,
        system: usize,
        staff: &'a StaffId,
    ) -> impl Iterator<Item = &'a NotationElement> + 'a {
        self.elements
            .iter()
            .filter(move |e| e.system == system && &e.staff == staff)
    }

    /// Split a curve into one segment per system it crosses
    ///
    /// Fails with [`CurveError::InvalidSegment`] when an endpoint's system
    /// does not exist or the end precedes the start.
    pub fn segments(&self, curve: &CurvedElement) -> Result<Vec<CurveSegment>, CurveError> {
        let (first, last) = (curve.start.system, curve.end.system);
        if last < first {
            return Err(CurveError::InvalidSegment {
                element: curve.id.clone(),
                reason: format!("ends in system {} before its start system {}", last, first),
            });
        }
        if last >= self.systems.len() {
            return Err(CurveError::InvalidSegment {
                element: curve.id.clone(),
                reason: format!("system {} is not in the layout ({} systems)", last, self.systems.len()),
            });
        }

        if first == last {
            return Ok(vec![CurveSegment {
                index: 0,
                system: first,
                staff: curve.start.staff.clone(),
                x1: curve.start.x,
                x2: curve.end.x,
                spanning: SpanningType::Whole,
            }]);
        }

        Ok((first..=last)
            .enumerate()
            .map(|(index, system_idx)| {
                let system = &self.systems[system_idx];
                let (spanning, staff, x1, x2) = if system_idx == first {
                    (SpanningType::Start, &curve.start.staff, curve.start.x, system.right)
                } else if system_idx == last {
                    (SpanningType::End, &curve.end.staff, system.left, curve.end.x)
                } else {
                    (SpanningType::Middle, &curve.start.staff, system.left, system.right)
                };
                CurveSegment {
                    index,
                    system: system_idx,
                    staff: staff.clone(),
                    x1,
                    x2,
                    spanning,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::curve::CurveEndpoint;

    fn two_system_layout() -> ScoreLayout {
        ScoreLayout {
            systems: vec![
                System {
                    left: 50.0,
                    right: 1000.0,
                    staves: vec![Staff::new("P1", 100.0)],
                },
                System {
                    left: 80.0,
                    right: 1000.0,
                    staves: vec![Staff::new("P1", 600.0)],
                },
                System {
                    left: 80.0,
                    right: 1000.0,
                    staves: vec![Staff::new("P1", 1100.0)],
                },
            ],
            elements: Vec::new(),
            curves: Vec::new(),
        }
    }

    #[test]
    fn test_single_system_curve_is_whole() {
        let layout = two_system_layout();
        let slur = CurvedElement::new(
            "sl1",
            CurveEndpoint::new("P1", 100.0, 120.0),
            CurveEndpoint::new("P1", 400.0, 120.0),
        );
        let segments = layout.segments(&slur).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].spanning, SpanningType::Whole);
        assert_eq!((segments[0].x1, segments[0].x2), (100.0, 400.0));
    }

    #[test]
    fn test_curve_split_at_system_breaks() {
        let layout = two_system_layout();
        let slur = CurvedElement::new(
            "sl1",
            CurveEndpoint::new("P1", 700.0, 120.0),
            CurveEndpoint::new("P1", 300.0, 1120.0).in_system(2),
        );
        let segments = layout.segments(&slur).unwrap();
        let kinds: Vec<SpanningType> = segments.iter().map(|s| s.spanning).collect();
        assert_eq!(
            kinds,
            vec![SpanningType::Start, SpanningType::Middle, SpanningType::End]
        );
        assert_eq!((segments[0].x1, segments[0].x2), (700.0, 1000.0));
        assert_eq!((segments[1].x1, segments[1].x2), (80.0, 1000.0));
        assert_eq!((segments[2].x1, segments[2].x2), (80.0, 300.0));
        assert_eq!(segments[2].index, 2);
    }

    #[test]
    fn test_unsplittable_curves_are_invalid() {
        let layout = two_system_layout();
        let slur = CurvedElement::new(
            "sl1",
            CurveEndpoint::new("P1", 100.0, 120.0),
            CurveEndpoint::new("P1", 300.0, 120.0).in_system(7),
        );
        assert!(matches!(
            layout.segments(&slur),
            Err(CurveError::InvalidSegment { ref element, .. }) if element.as_str() == "sl1"
        ));

        let reversed = CurvedElement::new(
            "sl2",
            CurveEndpoint::new("P1", 100.0, 120.0).in_system(1),
            CurveEndpoint::new("P1", 300.0, 120.0),
        );
        assert!(matches!(layout.segments(&reversed), Err(CurveError::InvalidSegment { .. })));
    }
}
