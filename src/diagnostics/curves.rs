//! Curve diagnostics - reports what the curve engine could not do cleanly
//!
//! Runs a measurement pass curve by curve, so one malformed curve does not
//! hide the others, and reports:
//! - curves that cannot be split into segments or refer to unknown staves (error)
//! - anchors that name elements missing from the layout (warning)
//! - segments whose obstacles could not all be cleared (warning)
//! - line forms drawn with a fallback pen (info)

use super::{DiagnosticMark, DiagnosticSeverity, Diagnostics};
use crate::config::EngravingOptions;
use crate::curves::{CurveHandling, PositionerArena};
use crate::models::{CurvedElement, ScoreLayout};
use crate::renderers::bbox::BBoxDeviceContext;
use crate::renderers::curve_renderer::pen_for;
use crate::renderers::device::GroupId;
use crate::renderers::view::View;

/// Analyze every curve of a layout
pub fn analyze_curves(layout: &ScoreLayout, options: &EngravingOptions) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let mut arena = PositionerArena::new();
    let mut dc = BBoxDeviceContext::new();

    for curve in &layout.curves {
        diagnostics.extend(check_anchors(layout, curve));

        if pen_for(curve.lform).1 {
            diagnostics.add(DiagnosticMark::new(
                curve.id.clone(),
                DiagnosticSeverity::Info,
                "curve_line_form_fallback",
                format!("{:?} line form is drawn as a solid curve", curve.lform),
            ));
        }

        let segments = match layout.segments(curve) {
            Ok(segments) => segments,
            Err(e) => {
                diagnostics.add(DiagnosticMark::new(
                    curve.id.clone(),
                    DiagnosticSeverity::Error,
                    "curve_no_segments",
                    e.to_string(),
                ));
                continue;
            }
        };

        let mut view = View::new(layout, options, &mut arena, CurveHandling::Initialize);
        let mut graphic: Option<GroupId> = None;
        for segment in &segments {
            match view.draw_curve(&mut dc, curve, segment, graphic) {
                Ok(drawn) => {
                    graphic.get_or_insert(drawn.rendered.group);
                    let Some(solution) = drawn.solution else {
                        continue;
                    };
                    if !solution.resolved {
                        diagnostics.add(
                            DiagnosticMark::new(
                                curve.id.clone(),
                                DiagnosticSeverity::Warning,
                                "curve_unresolved_collision",
                                format!(
                                    "Curve could not clear every obstacle after {} iterations",
                                    solution.iterations
                                ),
                            )
                            .on_segment(segment.index),
                        );
                    }
                }
                Err(e) => {
                    diagnostics.add(
                        DiagnosticMark::new(
                            curve.id.clone(),
                            DiagnosticSeverity::Error,
                            "curve_invalid",
                            e.to_string(),
                        )
                        .on_segment(segment.index),
                    );
                    break;
                }
            }
        }
    }

    log::debug!("Curve analysis produced {} marks", diagnostics.marks.len());
    diagnostics
}

fn check_anchors(layout: &ScoreLayout, curve: &CurvedElement) -> Vec<DiagnosticMark> {
    [&curve.start, &curve.end]
        .into_iter()
        .filter_map(|endpoint| endpoint.element.as_ref())
        .filter(|id| layout.element(id).is_none())
        .map(|id| {
            DiagnosticMark::new(
                curve.id.clone(),
                DiagnosticSeverity::Warning,
                "curve_unknown_anchor",
                format!("Anchor element {} is not in the layout", id),
            )
        })
        .collect()
}
