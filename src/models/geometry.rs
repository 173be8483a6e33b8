//! Geometry shared by layout and rendering
//!
//! Coordinates are device units with y growing downwards (the SVG convention),
//! so a curve placed "above" its notes has a smaller y than the noteheads.
//! Points, boxes and curves are `kurbo` types; layout documents spell boxes
//! as `left/top/right/bottom`.

pub use kurbo::{CubicBez, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Layout document form of an element box
#[derive(Serialize, Deserialize)]
#[serde(remote = "Rect")]
pub struct RectDef {
    #[serde(rename = "left")]
    pub x0: f64,
    #[serde(rename = "top")]
    pub y0: f64,
    #[serde(rename = "right")]
    pub x1: f64,
    #[serde(rename = "bottom")]
    pub y1: f64,
}

/// Whether the horizontal extent of `rect` meets the closed interval `[x1, x2]`
pub fn overlaps_x(rect: &Rect, x1: f64, x2: f64) -> bool {
    let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
    rect.x1 >= lo && rect.x0 <= hi
}

/// Control points of a cubic, in order
pub fn control_points(curve: &CubicBez) -> [Point; 4] {
    [curve.p0, curve.p1, curve.p2, curve.p3]
}

/// Same curve moved vertically by `dy`
pub fn shift_curve(curve: &CubicBez, dy: f64) -> CubicBez {
    let v = Vec2::new(0.0, dy);
    CubicBez::new(curve.p0 + v, curve.p1 + v, curve.p2 + v, curve.p3 + v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Boxed {
        #[serde(with = "RectDef")]
        bbox: Rect,
    }

    #[test]
    fn test_rect_uses_edge_names() {
        let boxed: Boxed =
            serde_json::from_str(r#"{"bbox": {"left": 0, "top": 5, "right": 10, "bottom": 20}}"#).unwrap();
        assert_eq!(boxed.bbox, Rect::new(0.0, 5.0, 10.0, 20.0));
        let json = serde_json::to_value(&boxed).unwrap();
        assert_eq!(json["bbox"]["right"], 10.0);
    }

    #[test]
    fn test_overlaps_x_is_closed_interval() {
        let bbox = Rect::new(10.0, 0.0, 20.0, 5.0);
        assert!(overlaps_x(&bbox, 20.0, 30.0));
        assert!(overlaps_x(&bbox, 0.0, 10.0));
        assert!(overlaps_x(&bbox, 30.0, 15.0));
        assert!(!overlaps_x(&bbox, 20.5, 30.0));
    }

    #[test]
    fn test_shift_curve_moves_every_point() {
        let curve = CubicBez::new((0.0, 10.0), (5.0, 0.0), (15.0, 0.0), (20.0, 10.0));
        let moved = control_points(&shift_curve(&curve, 50.0));
        assert_eq!(moved[0], Point::new(0.0, 60.0));
        assert_eq!(moved[2], Point::new(15.0, 50.0));
    }
}
