//! Collision-aware curvature calculation
//!
//! Builds a symmetric cubic between the segment endpoints, then raises it
//! until every obstacle on its side is cleared. When the height cap is hit
//! the direction is flipped once (unless the direction was requested
//! explicitly). The search is bounded by `slur_max_iterations`; when the bound
//! is reached the curve with the least total violation is kept. Collision-free
//! output is attempted, never guaranteed.
//!
//! All vertical positions are relative to the top line of the segment's
//! staff. Obstacles from the other staff of a cross-staff curve are shifted
//! into that frame using the staves' current placement.

use serde::Serialize;

use super::bezier;
use super::positioner::CurvePositioner;
use super::span_collector::{CurveSide, SpanCollector, SpannedElement};
use crate::config::EngravingOptions;
use crate::errors::CurveError;
use crate::models::{
    CubicBez, CurveDirection, CurveEndpoint, CurveSegment, CurvedElement, LayerPosition, Point,
    ScoreLayout, SpanningType, Staff, StaffId, StemDirection, Vec2,
};

/// Lowest parameter used when converting a violation into extra height;
/// the highest is `1.0 - MIN_LIFT_T`
const MIN_LIFT_T: f64 = 0.1;

/// Violations below this are treated as cleared
const CLEARANCE_EPSILON: f64 = 1e-6;

/// Outcome of one curvature computation
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CurveSolution {
    pub direction: CurveDirection,
    /// Vertical offset of the control points from the endpoints
    pub height: f64,
    pub iterations: usize,
    /// Every obstacle on the curve's side was cleared
    pub resolved: bool,
    /// The direction was flipped to find room
    pub flipped: bool,
}

/// Computes curve geometry for one segment
pub struct CurveCalculator<'a> {
    layout: &'a ScoreLayout,
    options: &'a EngravingOptions,
}

struct Attempt {
    curve: CubicBez,
    direction: CurveDirection,
    height: f64,
    violation: f64,
}

impl<'a> CurveCalculator<'a> {
    pub fn new(layout: &'a ScoreLayout, options: &'a EngravingOptions) -> Self {
        Self { layout, options }
    }

    fn staff(&self, system: usize, endpoint_staff: &StaffId) -> Result<&'a Staff, CurveError> {
        self.layout
            .staff(system, endpoint_staff)
            .ok_or_else(|| CurveError::UnknownStaff {
                staff: endpoint_staff.clone(),
                system,
            })
    }

    /// Solve the segment's geometry and store it on the positioner
    pub fn compute_initial_curve(
        &self,
        curve: &CurvedElement,
        segment: &CurveSegment,
        positioner: &mut CurvePositioner,
    ) -> Result<CurveSolution, CurveError> {
        let staff = self.staff(segment.system, &segment.staff)?;
        let unit = staff.drawing_unit(self.options.unit);

        let mut direction = match positioner.direction() {
            CurveDirection::Undetermined => self.initial_direction(curve),
            determined if !positioner.is_cross_staff() => determined,
            _ => self.initial_direction(curve),
        };
        let initial = direction;

        // Obstacles are collected against the unshifted baseline so both
        // directions are judged against the same list.
        let (base_start, base_end) = self.anchor_points(curve, segment, staff, direction)?;
        let obstacles = self.collect_obstacles(curve, segment, staff, base_start, base_end)?;

        let width = (segment.x2 - segment.x1).abs();
        let cap = unit * self.options.slur_max_height;
        let base_height = self.base_height(width, unit);
        let clearance = unit * self.options.slur_clearance;
        let can_flip = curve.requested_direction().is_none();

        let mut height = base_height;
        let mut flipped = false;
        let mut resolved = false;
        let mut iterations = 0;
        let mut best: Option<Attempt> = None;

        while iterations < self.options.slur_max_iterations {
            iterations += 1;

            let (anchor_start, anchor_end) = self.anchor_points(curve, segment, staff, direction)?;
            let (start, end) = self.offset_endpoints(anchor_start, anchor_end, direction, unit);
            let candidate = build_curve(start, end, height, direction, self.options.slur_control_inset);
            let (violation, worst) =
                measure_violation(&candidate, &obstacles, direction, clearance, self.options.flatten_tolerance);

            if best.as_ref().map_or(true, |b| violation < b.violation) {
                best = Some(Attempt {
                    curve: candidate,
                    direction,
                    height,
                    violation,
                });
            }

            if violation <= CLEARANCE_EPSILON {
                resolved = true;
                break;
            }

            // Raising both control points by dh lifts the curve by 3t(1-t)dh at t
            let (depth, t) = worst;
            let t = t.clamp(MIN_LIFT_T, 1.0 - MIN_LIFT_T);
            let next = height + depth / (3.0 * t * (1.0 - t)) + 0.01 * unit;

            if next <= cap {
                height = next;
            } else if can_flip && !flipped {
                log::debug!(
                    "Curve {} segment {} cannot clear obstacles {:?}, flipping",
                    curve.id,
                    segment.index,
                    direction
                );
                direction = direction.flipped();
                flipped = true;
                height = base_height;
            } else if height < cap {
                height = cap;
            } else {
                break;
            }
        }

        // the loop runs at least once (validated options), so best is set
        let best = best.unwrap_or(Attempt {
            curve: build_curve(base_start, base_end, base_height, direction, self.options.slur_control_inset),
            direction,
            height: base_height,
            violation: 0.0,
        });

        if !resolved {
            log::warn!(
                "Curve {} segment {}: {} unresolved after {} iterations, keeping best effort",
                curve.id,
                segment.index,
                best.violation,
                iterations
            );
        }

        positioner.set_curve(best.curve);
        positioner.set_direction(best.direction);
        positioner.set_thickness(unit * self.options.slur_midpoint_thickness);
        positioner.clear_spanned_elements();
        positioner.add_spanned_elements(obstacles);
        positioner.mark_calculated(resolved);

        Ok(CurveSolution {
            direction: best.direction,
            height: best.height,
            iterations,
            resolved,
            flipped: best.direction != initial,
        })
    }

    /// Unobstructed control-point height for a span
    pub fn base_height(&self, width: f64, unit: f64) -> f64 {
        let height = unit * self.options.slur_min_height + width * self.options.slur_height_ratio;
        height.min(unit * self.options.slur_max_height)
    }

    /// Default direction from the musical context
    ///
    /// Requested `curvedir`, then the voice position, then stems (curves
    /// go opposite the stems), then above.
    pub fn initial_direction(&self, curve: &CurvedElement) -> CurveDirection {
        if let Some(requested) = curve.requested_direction() {
            return requested;
        }

        for layer in [curve.start.layer, curve.end.layer].into_iter().flatten() {
            match layer {
                LayerPosition::Upper => return CurveDirection::Above,
                LayerPosition::Lower => return CurveDirection::Below,
                LayerPosition::Single => {}
            }
        }

        match (self.stem_of(&curve.start), self.stem_of(&curve.end)) {
            (Some(StemDirection::Up), Some(StemDirection::Up))
            | (Some(StemDirection::Up), None)
            | (None, Some(StemDirection::Up)) => CurveDirection::Below,
            _ => CurveDirection::Above,
        }
    }

    fn stem_of(&self, endpoint: &CurveEndpoint) -> Option<StemDirection> {
        endpoint.stem.or_else(|| {
            endpoint
                .element
                .as_ref()
                .and_then(|id| self.layout.element(id))
                .and_then(|e| e.stem_direction())
        })
    }

    /// Notehead positions of the segment ends in the segment staff's frame
    fn anchor_points(
        &self,
        curve: &CurvedElement,
        segment: &CurveSegment,
        staff: &Staff,
        direction: CurveDirection,
    ) -> Result<(Point, Point), CurveError> {
        let edge_y = match direction {
            CurveDirection::Below => staff.height(self.options.unit),
            _ => 0.0,
        };

        let (y1, y2) = match segment.spanning {
            SpanningType::Whole => {
                let end_y = curve.end.y + self.staff_offset(segment.system, &curve.end, staff)?;
                (curve.start.y, end_y)
            }
            SpanningType::Start => (curve.start.y, curve.start.y),
            SpanningType::End => (curve.end.y, curve.end.y),
            SpanningType::Middle => (edge_y, edge_y),
        };

        Ok((Point::new(segment.x1, y1), Point::new(segment.x2, y2)))
    }

    /// Vertical shift from `endpoint`'s staff frame into `staff`'s frame
    fn staff_offset(&self, system: usize, endpoint: &CurveEndpoint, staff: &Staff) -> Result<f64, CurveError> {
        if endpoint.staff == staff.id {
            return Ok(0.0);
        }
        let other = self.staff(system, &endpoint.staff)?;
        Ok(other.y - staff.y)
    }

    fn offset_endpoints(&self, start: Point, end: Point, direction: CurveDirection, unit: f64) -> (Point, Point) {
        let shift = Vec2::new(0.0, direction.sign() * unit * self.options.slur_endpoint_offset);
        (start + shift, end + shift)
    }

    fn collect_obstacles(
        &self,
        curve: &CurvedElement,
        segment: &CurveSegment,
        staff: &Staff,
        start: Point,
        end: Point,
    ) -> Result<Vec<SpannedElement>, CurveError> {
        let anchors = [curve.start.element.clone(), curve.end.element.clone()];
        let collector = SpanCollector::new(self.layout).excluding(anchors.into_iter().flatten());

        let mut obstacles = collector.collect(segment.system, &segment.staff, start, end);

        if curve.is_cross_staff() && segment.spanning == SpanningType::Whole {
            let other_id = if curve.start.staff == segment.staff {
                &curve.end.staff
            } else {
                &curve.start.staff
            };
            let other = self.staff(segment.system, other_id)?;
            let shift = Vec2::new(0.0, other.y - staff.y);
            let from_other = collector
                .collect(segment.system, other_id, start - shift, end - shift)
                .into_iter()
                .map(|mut s| {
                    s.bbox = s.bbox + shift;
                    s
                });
            obstacles.extend(from_other);
            obstacles.sort_by(|a, b| {
                a.bbox
                    .x0
                    .total_cmp(&b.bbox.x0)
                    .then_with(|| a.element.cmp(&b.element))
            });
        }

        Ok(obstacles)
    }
}

/// Symmetric cubic with control points inset by `inset` of the span
/// and lifted by `height` away from the notes
pub fn build_curve(start: Point, end: Point, height: f64, direction: CurveDirection, inset: f64) -> CubicBez {
    let dx = (end.x - start.x) * inset;
    let dy = direction.sign() * height;
    CubicBez::new(
        start,
        Point::new(start.x + dx, start.y + dy),
        Point::new(end.x - dx, end.y + dy),
        end,
    )
}

/// Total violation over the obstacles on the curve's side, plus the worst
/// single violation as `(depth, t)`
///
/// Clearance is tested against the curve flattened within `tolerance`. The
/// chords lie on the inner side of the arch, so a cleared polyline means a
/// cleared curve.
fn measure_violation(
    curve: &CubicBez,
    obstacles: &[SpannedElement],
    direction: CurveDirection,
    clearance: f64,
    tolerance: f64,
) -> (f64, (f64, f64)) {
    let side = match direction {
        CurveDirection::Below => CurveSide::Below,
        _ => CurveSide::Above,
    };
    let (lo, hi) = if curve.p0.x <= curve.p3.x {
        (curve.p0.x, curve.p3.x)
    } else {
        (curve.p3.x, curve.p0.x)
    };
    let polyline = bezier::flatten(curve, tolerance);

    let mut total = 0.0;
    let mut worst = (0.0, 0.5);

    for obstacle in obstacles.iter().filter(|o| o.side == side) {
        let left = obstacle.bbox.x0.max(lo);
        let right = obstacle.bbox.x1.min(hi);
        if left > right {
            continue;
        }

        let vertices = polyline.iter().map(|p| p.x).filter(|x| *x > left && *x < right);
        let mut deepest = (0.0_f64, 0.5_f64);
        for x in [left, (left + right) / 2.0, right].into_iter().chain(vertices) {
            let Some(y) = bezier::polyline_y_at(&polyline, x) else {
                continue;
            };
            let depth = match side {
                CurveSide::Above => y - (obstacle.bbox.y0 - clearance),
                CurveSide::Below => (obstacle.bbox.y1 + clearance) - y,
            };
            if depth > deepest.0 {
                deepest = (depth, bezier::x_to_t(curve, x));
            }
        }

        total += deepest.0;
        if deepest.0 > worst.0 {
            worst = deepest;
        }
    }

    (total, worst)
}
