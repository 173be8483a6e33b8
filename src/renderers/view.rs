//! Draw entry point for curve segments
//!
//! [`View::draw_curve`] is called once per segment in every pass. It finds
//! (or, when measuring, creates) the segment's positioner, asks the gate
//! whether the geometry has to be solved, solves it if so, and hands the
//! positioner to the renderer.

use serde::Serialize;

use super::curve_renderer::{CurveRenderer, RenderedSegment};
use super::device::{DeviceContext, GroupId};
use crate::config::EngravingOptions;
use crate::curves::{CurveCalculator, CurveHandling, CurveSolution, PositionerArena, PositionerKey, RecalculationGate};
use crate::errors::CurveError;
use crate::models::{CurveSegment, CurvedElement, ScoreLayout};

/// Result of drawing one segment
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DrawnSegment {
    pub key: PositionerKey,
    /// Set when the geometry was solved during this draw
    pub solution: Option<CurveSolution>,
    pub rendered: RenderedSegment,
}

pub struct View<'a> {
    layout: &'a ScoreLayout,
    options: &'a EngravingOptions,
    arena: &'a mut PositionerArena,
    handling: CurveHandling,
}

impl<'a> View<'a> {
    pub fn new(
        layout: &'a ScoreLayout,
        options: &'a EngravingOptions,
        arena: &'a mut PositionerArena,
        handling: CurveHandling,
    ) -> Self {
        Self {
            layout,
            options,
            arena,
            handling,
        }
    }

    /// Draw one segment of `curve`
    ///
    /// Outside a measurement pass the positioner must already exist, and a
    /// segment is only drawn from solved geometry. A missing positioner, or one
    /// left unsolved (reset by re-justification, or measured with
    /// [`CurveHandling::Reuse`]), is reported as [`CurveError::MissingLayoutState`].
    pub fn draw_curve(
        &mut self,
        dc: &mut dyn DeviceContext,
        curve: &CurvedElement,
        segment: &CurveSegment,
        graphic: Option<GroupId>,
    ) -> Result<DrawnSegment, CurveError> {
        let key = PositionerKey::new(curve.id.clone(), segment.index);
        let measuring = dc.is_measurement();

        let positioner = if measuring {
            self.arena.get_or_create(&key, curve.is_cross_staff())
        } else {
            self.arena
                .get_mut(&key)
                .ok_or_else(|| CurveError::MissingLayoutState {
                    element: curve.id.clone(),
                    segment: segment.index,
                })?
        };

        let solution = if RecalculationGate::needs_recalculation(
            self.handling,
            measuring,
            positioner.direction(),
            positioner.is_cross_staff(),
        ) {
            let calculator = CurveCalculator::new(self.layout, self.options);
            Some(calculator.compute_initial_curve(curve, segment, positioner)?)
        } else {
            None
        };

        if !positioner.is_determined() {
            return Err(CurveError::MissingLayoutState {
                element: curve.id.clone(),
                segment: segment.index,
            });
        }

        if solution.is_some() {
            self.arena.register_articulations(&key);
        }

        let staff = self
            .layout
            .staff(segment.system, &segment.staff)
            .ok_or_else(|| CurveError::UnknownStaff {
                staff: segment.staff.clone(),
                system: segment.system,
            })?;
        let positioner = self
            .arena
            .get(&key)
            .ok_or_else(|| CurveError::MissingLayoutState {
                element: curve.id.clone(),
                segment: segment.index,
            })?;

        let rendered = CurveRenderer::new(self.options).draw(dc, curve, positioner, staff, graphic);

        Ok(DrawnSegment {
            key,
            solution,
            rendered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurveDirection, CurveEndpoint, SpanningType, Staff, System};
    use crate::renderers::bbox::BBoxDeviceContext;
    use crate::renderers::display_list::RecordingDeviceContext;

    fn layout() -> ScoreLayout {
        let curve = CurvedElement::new(
            "sl1",
            CurveEndpoint::new("s1", 0.0, 36.0),
            CurveEndpoint::new("s1", 100.0, 36.0),
        );
        ScoreLayout {
            systems: vec![System {
                left: 0.0,
                right: 1000.0,
                staves: vec![Staff::new("s1", 100.0)],
            }],
            elements: Vec::new(),
            curves: vec![curve],
        }
    }

    fn segment() -> CurveSegment {
        CurveSegment {
            index: 0,
            system: 0,
            staff: crate::models::StaffId::new("s1"),
            x1: 0.0,
            x2: 100.0,
            spanning: SpanningType::Whole,
        }
    }

    #[test]
    fn test_final_pass_without_measurement_is_missing_state() {
        let layout = layout();
        let options = EngravingOptions::default();
        let mut arena = PositionerArena::new();
        let mut view = View::new(&layout, &options, &mut arena, CurveHandling::Reuse);
        let mut dc = RecordingDeviceContext::new();

        let result = view.draw_curve(&mut dc, &layout.curves[0], &segment(), None);
        assert!(matches!(result, Err(CurveError::MissingLayoutState { segment: 0, .. })));
        assert!(dc.display_list().is_empty());
    }

    #[test]
    fn test_measure_then_reuse() {
        let layout = layout();
        let options = EngravingOptions::default();
        let mut arena = PositionerArena::new();

        let mut measure = BBoxDeviceContext::new();
        let drawn = View::new(&layout, &options, &mut arena, CurveHandling::Initialize)
            .draw_curve(&mut measure, &layout.curves[0], &segment(), None)
            .unwrap();
        assert!(drawn.solution.is_some());

        let mut dc = RecordingDeviceContext::new();
        let drawn = View::new(&layout, &options, &mut arena, CurveHandling::Reuse)
            .draw_curve(&mut dc, &layout.curves[0], &segment(), None)
            .unwrap();
        assert!(drawn.solution.is_none());

        let positioner = arena.get(&drawn.key).unwrap();
        assert_eq!(positioner.direction(), CurveDirection::Above);
        assert_eq!(positioner.calculation_count(), 1);
        assert_eq!(dc.display_list().strokes().count(), 1);
    }

    #[test]
    fn test_unsolved_positioner_is_never_drawn() {
        let layout = layout();
        let options = EngravingOptions::default();
        let mut arena = PositionerArena::new();

        // measuring without Initialize leaves the positioner unsolved
        let mut measure = BBoxDeviceContext::new();
        let result = View::new(&layout, &options, &mut arena, CurveHandling::Reuse).draw_curve(
            &mut measure,
            &layout.curves[0],
            &segment(),
            None,
        );
        assert!(matches!(result, Err(CurveError::MissingLayoutState { .. })));
        assert!(measure.extent().is_none());

        let mut dc = RecordingDeviceContext::new();
        let result = View::new(&layout, &options, &mut arena, CurveHandling::Reuse).draw_curve(
            &mut dc,
            &layout.curves[0],
            &segment(),
            None,
        );
        assert!(matches!(result, Err(CurveError::MissingLayoutState { segment: 0, .. })));
        assert!(dc.display_list().is_empty());
    }

    #[test]
    fn test_second_measurement_keeps_determined_direction() {
        let layout = layout();
        let options = EngravingOptions::default();
        let mut arena = PositionerArena::new();
        for _ in 0..2 {
            let mut measure = BBoxDeviceContext::new();
            View::new(&layout, &options, &mut arena, CurveHandling::Initialize)
                .draw_curve(&mut measure, &layout.curves[0], &segment(), None)
                .unwrap();
        }
        let key = PositionerKey::new(layout.curves[0].id.clone(), 0);
        assert_eq!(arena.get(&key).unwrap().calculation_count(), 1);
    }
}
