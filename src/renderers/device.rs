//! Drawing primitives shared by every output target
//!
//! A [`DeviceContext`] receives grouped drawing calls. The same calls are
//! issued in the measurement pass (to a context that only accumulates bounding
//! boxes) and in the final pass (to a recording or SVG context).

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::models::geometry::control_points;
use crate::models::{CubicBez, ElementId, Point};

/// Handle of a drawing group, unique within one context
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GroupId(pub u32);

/// Pen used to stroke a curve
#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PenStyle {
    #[default]
    Solid = 0,
    ShortDash = 1,
    Dot = 2,
}

impl PenStyle {
    /// SVG `stroke-dasharray` for the pen at `width`, `None` for a solid pen
    pub fn dash_array(self, width: f64) -> Option<String> {
        match self {
            PenStyle::Solid => None,
            PenStyle::ShortDash => Some(format!("{} {}", fmt_len(width * 4.0), fmt_len(width * 3.0))),
            PenStyle::Dot => Some(format!("{} {}", fmt_len(width * 0.5), fmt_len(width * 2.0))),
        }
    }
}

fn fmt_len(v: f64) -> String {
    format!("{:.2}", v.max(0.01))
}

/// A filled ribbon between two cubics sharing their endpoints
///
/// Outlines are kept as control point arrays, the form handed to JavaScript.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ThickBezier {
    pub top: [Point; 4],
    pub bottom: [Point; 4],
    /// Pen width the outline is stroked with
    pub pen_width: f64,
}

impl ThickBezier {
    pub fn new(top: &CubicBez, bottom: &CubicBez, pen_width: f64) -> Self {
        Self {
            top: control_points(top),
            bottom: control_points(bottom),
            pen_width,
        }
    }

    pub fn top_curve(&self) -> CubicBez {
        let [p0, p1, p2, p3] = self.top;
        CubicBez::new(p0, p1, p2, p3)
    }

    pub fn bottom_curve(&self) -> CubicBez {
        let [p0, p1, p2, p3] = self.bottom;
        CubicBez::new(p0, p1, p2, p3)
    }
}

/// Output target for drawing calls
pub trait DeviceContext {
    /// True while sizing content (no visible output is produced)
    fn is_measurement(&self) -> bool;

    /// Open a new group for the given owner
    fn start_group(&mut self, owner: &ElementId) -> GroupId;

    /// Re-open a group started earlier, so a later segment joins it
    fn resume_group(&mut self, group: GroupId);

    fn end_group(&mut self);

    fn end_resumed_group(&mut self);

    /// Stroke a cubic's centre line
    fn stroke_bezier(&mut self, curve: &CubicBez, width: f64, style: PenStyle);

    /// Fill a thick cubic
    fn fill_thick_bezier(&mut self, ribbon: &ThickBezier);
}
