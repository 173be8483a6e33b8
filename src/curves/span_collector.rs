//! Collect the notation elements a curve segment spans
//!
//! Every element on the segment's staff whose horizontal extent meets the
//! closed interval `[x1, x2]` is returned, tagged with the side of the curve's
//! nominal baseline (the chord between the segment endpoints) it lies on.

use serde::Serialize;

use crate::models::geometry::overlaps_x;
use crate::models::{ElementId, Point, Rect, RectDef, ScoreLayout, StaffId};

/// Side of the curve's baseline an element sits on
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CurveSide {
    Above,
    Below,
}

/// An element inside a curve's horizontal span
///
/// Holds the element id and a copy of its geometry, never a borrow of the
/// layout, and is discarded together with the positioner arena when the
/// layout is invalidated.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SpannedElement {
    pub element: ElementId,
    #[serde(with = "RectDef")]
    pub bbox: Rect,
    pub side: CurveSide,
    /// Articulations and fermatas place themselves around curves
    pub avoids_curves: bool,
}

/// Enumerates obstacles for a curve segment
pub struct SpanCollector<'a> {
    layout: &'a ScoreLayout,
    excluded: Vec<ElementId>,
}

impl<'a> SpanCollector<'a> {
    pub fn new(layout: &'a ScoreLayout) -> Self {
        Self {
            layout,
            excluded: Vec::new(),
        }
    }

    /// Skip the given elements (the curve's own anchors)
    pub fn excluding(mut self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        self.excluded.extend(ids);
        self
    }

    /// Elements on `staff` of `system` between the baseline endpoints
    ///
    /// Sorted by left edge, then id, so repeated calls return the same order.
    pub fn collect(&self, system: usize, staff: &StaffId, start: Point, end: Point) -> Vec<SpannedElement> {
        let mut spanned: Vec<SpannedElement> = self
            .layout
            .elements_on(system, staff)
            .filter(|e| !self.excluded.contains(&e.id))
            .filter(|e| overlaps_x(&e.bbox, start.x, end.x))
            .map(|e| {
                let center = e.bbox.center();
                let side = if center.y < baseline_y_at(start, end, center.x) {
                    CurveSide::Above
                } else {
                    CurveSide::Below
                };
                SpannedElement {
                    element: e.id.clone(),
                    bbox: e.bbox,
                    side,
                    avoids_curves: e.avoids_curves(),
                }
            })
            .collect();

        spanned.sort_by(|a, b| {
            a.bbox
                .x0
                .total_cmp(&b.bbox.x0)
                .then_with(|| a.element.cmp(&b.element))
        });

        log::debug!(
            "Collected {} spanned elements on staff {} (system {}) over [{}, {}]",
            spanned.len(),
            staff,
            system,
            start.x,
            end.x
        );
        spanned
    }
}

/// Y of the chord from `start` to `end` at `x`, clamped to the chord
fn baseline_y_at(start: Point, end: Point, x: f64) -> f64 {
    let dx = end.x - start.x;
    if dx.abs() < f64::EPSILON {
        return (start.y + end.y) / 2.0;
    }
    let t = ((x - start.x) / dx).clamp(0.0, 1.0);
    start.y + (end.y - start.y) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElementKind, NotationElement, Staff, System};

    fn layout_with(elements: Vec<NotationElement>) -> ScoreLayout {
        ScoreLayout {
            systems: vec![System {
                left: 0.0,
                right: 1000.0,
                staves: vec![Staff::new("s1", 100.0), Staff::new("s2", 300.0)],
            }],
            elements,
            curves: Vec::new(),
        }
    }

    fn note(id: &str, staff: &str, left: f64, top: f64) -> NotationElement {
        NotationElement::new(
            id,
            staff,
            Rect::new(left, top, left + 10.0, top + 10.0),
            ElementKind::Note { stem: None },
        )
    }

    #[test]
    fn test_collects_exactly_intersecting_elements() {
        let layout = layout_with(vec![
            note("before", "s1", -20.0, 100.0),
            note("touch-left", "s1", -10.0, 100.0),
            note("inside", "s1", 40.0, 100.0),
            note("touch-right", "s1", 100.0, 100.0),
            note("after", "s1", 101.0, 100.0),
            note("other-staff", "s2", 40.0, 300.0),
        ]);
        let collector = SpanCollector::new(&layout);
        let spanned = collector.collect(
            0,
            &StaffId::new("s1"),
            Point::new(0.0, 120.0),
            Point::new(100.0, 120.0),
        );
        let ids: Vec<&str> = spanned.iter().map(|s| s.element.as_str()).collect();
        assert_eq!(ids, vec!["touch-left", "inside", "touch-right"]);
    }

    #[test]
    fn test_empty_span_is_valid() {
        let layout = layout_with(Vec::new());
        let spanned = SpanCollector::new(&layout).collect(
            0,
            &StaffId::new("s1"),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        assert!(spanned.is_empty());
    }

    #[test]
    fn test_side_classification_follows_baseline() {
        let layout = layout_with(vec![note("high", "s1", 20.0, 50.0), note("low", "s1", 60.0, 150.0)]);
        let spanned = SpanCollector::new(&layout).collect(
            0,
            &StaffId::new("s1"),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
        );
        assert_eq!(spanned[0].side, CurveSide::Above);
        assert_eq!(spanned[1].side, CurveSide::Below);
    }

    #[test]
    fn test_order_is_stable_and_anchors_excluded() {
        let layout = layout_with(vec![
            note("b", "s1", 30.0, 100.0),
            note("a", "s1", 30.0, 100.0),
            note("anchor", "s1", 0.0, 100.0),
        ]);
        let collector = SpanCollector::new(&layout).excluding([ElementId::new("anchor")]);
        let staff = StaffId::new("s1");
        let first = collector.collect(0, &staff, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let second = collector.collect(0, &staff, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(first, second);
        let ids: Vec<&str> = first.iter().map(|s| s.element.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
