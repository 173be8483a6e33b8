//! Stroke generation for solved curves
//!
//! Maps the curve's line form to a pen, scales the declared thickness by the
//! curve's geometry and issues the drawing calls inside the curve's group.

use serde::Serialize;

use super::device::{DeviceContext, GroupId, PenStyle, ThickBezier};
use crate::config::EngravingOptions;
use crate::curves::{bezier, CurvePositioner};
use crate::models::geometry::shift_curve;
use crate::models::{CurvedElement, LineForm, Staff};

/// What was drawn for one segment
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct RenderedSegment {
    /// Group the segment was drawn in (new or resumed)
    pub group: GroupId,
    pub pen: PenStyle,
    /// Thickness after the geometry coefficient
    pub thickness: f64,
    /// The line form has no pen of its own and was drawn solid
    pub fallback: bool,
}

/// Pen for a line form, and whether it is a fallback
pub fn pen_for(lform: LineForm) -> (PenStyle, bool) {
    match lform {
        LineForm::Solid => (PenStyle::Solid, false),
        LineForm::Dashed => (PenStyle::ShortDash, false),
        LineForm::Dotted => (PenStyle::Dot, false),
        // no wavy pen on any device yet
        LineForm::Wavy => (PenStyle::Solid, true),
    }
}

pub struct CurveRenderer<'a> {
    options: &'a EngravingOptions,
}

impl<'a> CurveRenderer<'a> {
    pub fn new(options: &'a EngravingOptions) -> Self {
        Self { options }
    }

    /// Draw a solved segment on `staff`
    ///
    /// Positioner points are relative to the staff's top line and are moved
    /// to the staff's current placement here. When `graphic` is given the
    /// segment continues that group instead of opening a new one.
    pub fn draw(
        &self,
        dc: &mut dyn DeviceContext,
        curve: &CurvedElement,
        positioner: &CurvePositioner,
        staff: &Staff,
        graphic: Option<GroupId>,
    ) -> RenderedSegment {
        let unit = staff.drawing_unit(self.options.unit);
        let (pen, fallback) = pen_for(curve.lform);
        if fallback {
            log::debug!("Curve {}: {:?} line form drawn with a solid pen", curve.id, curve.lform);
        }

        let placed = shift_curve(&positioner.curve(), staff.y);
        let pen_width = self.options.slur_endpoint_thickness * unit;
        let thickness = positioner.thickness();
        let coefficient = bezier::thickness_coefficient(&placed, thickness, pen_width);
        let effective = thickness * coefficient;

        let group = match graphic {
            Some(group) => {
                dc.resume_group(group);
                group
            }
            None => dc.start_group(&curve.id),
        };

        match pen {
            PenStyle::Solid => {
                let (top, bottom) = bezier::thick_envelope(&placed, effective);
                dc.fill_thick_bezier(&ThickBezier::new(&top, &bottom, pen_width));
            }
            PenStyle::ShortDash | PenStyle::Dot => {
                dc.stroke_bezier(&placed, pen_width + effective / 2.0, pen);
            }
        }

        if graphic.is_some() {
            dc.end_resumed_group();
        } else {
            dc.end_group();
        }

        RenderedSegment {
            group,
            pen,
            thickness: effective,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CubicBez, CurveDirection, CurveEndpoint, Point};
    use crate::renderers::display_list::{DrawCommand, RecordingDeviceContext};

    fn solved() -> CurvePositioner {
        let mut positioner = CurvePositioner::new(false);
        positioner.set_curve(CubicBez::new((0.0, 27.0), (20.0, 11.0), (80.0, 11.0), (100.0, 27.0)));
        positioner.set_direction(CurveDirection::Above);
        positioner.set_thickness(5.4);
        positioner
    }

    fn curve(lform: LineForm) -> CurvedElement {
        let mut curve = CurvedElement::new(
            "sl1",
            CurveEndpoint::new("s1", 0.0, 36.0),
            CurveEndpoint::new("s1", 100.0, 36.0),
        );
        curve.lform = lform;
        curve
    }

    fn draw(lform: LineForm, graphic: Option<GroupId>) -> (RenderedSegment, Vec<DrawCommand>) {
        let options = EngravingOptions::default();
        let renderer = CurveRenderer::new(&options);
        let mut dc = RecordingDeviceContext::new();
        let staff = Staff::new("s1", 100.0);
        let rendered = renderer.draw(&mut dc, &curve(lform), &solved(), &staff, graphic);
        (rendered, dc.into_display_list().commands)
    }

    #[test]
    fn test_pen_mapping() {
        assert_eq!(pen_for(LineForm::Solid), (PenStyle::Solid, false));
        assert_eq!(pen_for(LineForm::Dashed), (PenStyle::ShortDash, false));
        assert_eq!(pen_for(LineForm::Dotted), (PenStyle::Dot, false));
        assert_eq!(pen_for(LineForm::Wavy), (PenStyle::Solid, true));
    }

    #[test]
    fn test_solid_draws_translated_ribbon_in_new_group() {
        let (rendered, commands) = draw(LineForm::Solid, None);
        assert!(!rendered.fallback);
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::StartGroup { .. }));
        match &commands[1] {
            DrawCommand::FillThickBezier(ribbon) => {
                assert_eq!(ribbon.top[0], Point::new(0.0, 127.0));
                assert_eq!(ribbon.top[3], Point::new(100.0, 127.0));
                assert!(ribbon.top[1].y < ribbon.bottom[1].y);
                assert!((ribbon.pen_width - 0.9).abs() < 1e-9);
            }
            other => panic!("expected a ribbon, got {:?}", other),
        }
        assert_eq!(commands[2], DrawCommand::EndGroup);
    }

    #[test]
    fn test_dashed_strokes_centre_line() {
        let (rendered, commands) = draw(LineForm::Dashed, None);
        match &commands[1] {
            DrawCommand::StrokeBezier { width, style, .. } => {
                assert_eq!(*style, PenStyle::ShortDash);
                assert!((*width - (0.9 + rendered.thickness / 2.0)).abs() < 1e-9);
            }
            other => panic!("expected a stroke, got {:?}", other),
        }
    }

    #[test]
    fn test_wavy_matches_solid() {
        let (solid, solid_commands) = draw(LineForm::Solid, None);
        let (wavy, wavy_commands) = draw(LineForm::Wavy, None);
        assert_eq!(solid_commands, wavy_commands);
        assert_eq!(solid.pen, wavy.pen);
        assert!(wavy.fallback);
    }

    #[test]
    fn test_resumed_graphic() {
        let (rendered, commands) = draw(LineForm::Dotted, Some(GroupId(7)));
        assert_eq!(rendered.group, GroupId(7));
        assert_eq!(commands[0], DrawCommand::ResumeGroup { group: GroupId(7) });
        assert_eq!(commands[2], DrawCommand::EndResumedGroup);
    }
}
