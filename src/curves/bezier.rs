//! Slur-specific helpers on top of `kurbo` cubics
//!
//! Curves here are always "horizontal" slurs: the control points lie between
//! the endpoints in x, so x(t) is monotonic and a curve can be queried by x.

use kurbo::{BezPath, CubicBez, ParamCurve, PathEl, Point, Vec2};

/// Bisection steps for inverting x(t); enough for sub-pixel accuracy on any page
const X_TO_T_STEPS: u32 = 40;

/// Parameter whose x is closest to `x`, clamped to the curve's extent
pub fn x_to_t(curve: &CubicBez, x: f64) -> f64 {
    let increasing = curve.p3.x >= curve.p0.x;
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..X_TO_T_STEPS {
        let mid = (lo + hi) / 2.0;
        if (curve.eval(mid).x < x) == increasing {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// Y of the curve at horizontal position `x`
pub fn y_at_x(curve: &CubicBez, x: f64) -> f64 {
    curve.eval(x_to_t(curve, x)).y
}

/// Approximate the curve by a polyline within `tolerance`
///
/// The first and last points are exactly the curve endpoints.
pub fn flatten(curve: &CubicBez, tolerance: f64) -> Vec<Point> {
    let mut path = BezPath::new();
    path.move_to(curve.p0);
    path.curve_to(curve.p1, curve.p2, curve.p3);

    let mut out = Vec::new();
    path.flatten(tolerance.max(f64::EPSILON), |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => out.push(p),
        _ => {}
    });
    out
}

/// Y of a flattened curve at `x`, interpolated between its vertices
///
/// `polyline` must be ordered by x, as returned by [`flatten`] for a slur.
pub fn polyline_y_at(polyline: &[Point], x: f64) -> Option<f64> {
    let (first, last) = (polyline.first()?, polyline.last()?);
    let (lo, hi) = if first.x <= last.x { (first, last) } else { (last, first) };
    if x <= lo.x {
        return Some(lo.y);
    }
    if x >= hi.x {
        return Some(hi.y);
    }
    polyline.windows(2).find_map(|w| {
        let (a, b) = (w[0], w[1]);
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        if x < left.x || x > right.x {
            return None;
        }
        let span = right.x - left.x;
        if span <= f64::EPSILON {
            return Some(left.y.max(right.y));
        }
        Some(left.y + (right.y - left.y) * (x - left.x) / span)
    })
}

/// Top and bottom outlines of a curve drawn as a ribbon of `thickness`
///
/// The endpoints are shared so the ribbon tapers to the pen width at both
/// ends; the control points are pushed apart vertically by `thickness`.
/// `top` is always the curve with the smaller y.
pub fn thick_envelope(curve: &CubicBez, thickness: f64) -> (CubicBez, CubicBez) {
    let half = Vec2::new(0.0, thickness / 2.0);
    let top = CubicBez::new(curve.p0, curve.p1 - half, curve.p2 - half, curve.p3);
    let bottom = CubicBez::new(curve.p0, curve.p1 + half, curve.p2 + half, curve.p3);
    (top, bottom)
}

/// Scale applied to the declared thickness when drawing a curve
///
/// Short curves (span below the thickness) keep the declared thickness. Longer
/// curves are thinned as they get steeper (control rise relative to span), but
/// never below the ratio of pen width to thickness, so a wider pen never yields
/// a thinner ribbon.
pub fn thickness_coefficient(curve: &CubicBez, thickness: f64, pen_width: f64) -> f64 {
    let dist = (curve.p3.x - curve.p0.x).abs();
    if thickness <= 0.0 || dist < thickness {
        return 1.0;
    }

    let rise = (curve.p1.y - curve.p0.y)
        .abs()
        .max((curve.p2.y - curve.p3.y).abs());
    let steepness = (rise / dist).min(1.0);
    let shaped = 1.0 - 0.4 * steepness;
    let floor = (pen_width.max(0.0) / thickness).min(1.0);

    shaped.max(floor).min(1.0)
}
