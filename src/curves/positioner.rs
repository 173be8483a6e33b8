//! Cached geometry of curve segments
//!
//! A [`CurvePositioner`] holds the solved shape of one rendered segment of a
//! curved element. Positioners live in a [`PositionerArena`] keyed by the
//! element id and segment index; the arena is the only mutable state the curve
//! engine touches during a layout cycle.

use serde::Serialize;
use std::collections::BTreeMap;

use super::span_collector::SpannedElement;
use crate::models::geometry::control_points;
use crate::models::{CubicBez, CurveDirection, ElementId, Point};

/// Identifies the positioner of one curve segment
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionerKey {
    pub element: ElementId,
    pub segment: usize,
}

impl PositionerKey {
    pub fn new(element: ElementId, segment: usize) -> Self {
        Self { element, segment }
    }
}

/// Solved shape of one curve segment
#[derive(Clone, Debug)]
pub struct CurvePositioner {
    curve: CubicBez,
    direction: CurveDirection,
    thickness: f64,
    cross_staff: bool,
    spanned: Vec<SpannedElement>,
    /// How many times the geometry has been computed since creation or the last reset
    calculations: usize,
    /// Whether the last computation cleared every obstacle
    resolved: bool,
}

impl CurvePositioner {
    pub fn new(cross_staff: bool) -> Self {
        Self {
            curve: CubicBez::new(Point::ZERO, Point::ZERO, Point::ZERO, Point::ZERO),
            direction: CurveDirection::Undetermined,
            thickness: 0.0,
            cross_staff,
            spanned: Vec::new(),
            calculations: 0,
            resolved: true,
        }
    }

    pub fn curve(&self) -> CubicBez {
        self.curve
    }

    pub fn set_curve(&mut self, curve: CubicBez) {
        self.curve = curve;
    }

    pub fn points(&self) -> [Point; 4] {
        control_points(&self.curve)
    }

    /// Geometry has been solved since creation or the last reset
    pub fn is_determined(&self) -> bool {
        self.direction != CurveDirection::Undetermined
    }

    pub fn direction(&self) -> CurveDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: CurveDirection) {
        self.direction = direction;
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    pub fn is_cross_staff(&self) -> bool {
        self.cross_staff
    }

    pub fn add_spanned_elements(&mut self, elements: impl IntoIterator<Item = SpannedElement>) {
        for element in elements {
            if !self.spanned.iter().any(|s| s.element == element.element) {
                self.spanned.push(element);
            }
        }
    }

    pub fn spanned_elements(&self) -> &[SpannedElement] {
        &self.spanned
    }

    pub fn clear_spanned_elements(&mut self) {
        self.spanned.clear();
    }

    pub fn calculation_count(&self) -> usize {
        self.calculations
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Record that the geometry was (re)computed
    pub fn mark_calculated(&mut self, resolved: bool) {
        self.calculations += 1;
        self.resolved = resolved;
    }

    /// Forget the solved shape (re-justification changed horizontal spacing)
    pub fn reset(&mut self) {
        *self = Self::new(self.cross_staff);
    }
}

/// All positioners of a layout cycle
#[derive(Debug, Default)]
pub struct PositionerArena {
    positioners: BTreeMap<PositionerKey, CurvePositioner>,
    /// Curves that an articulation/fermata has to keep clear of
    avoidance: BTreeMap<ElementId, Vec<PositionerKey>>,
}

impl PositionerArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PositionerKey) -> Option<&CurvePositioner> {
        self.positioners.get(key)
    }

    pub fn get_mut(&mut self, key: &PositionerKey) -> Option<&mut CurvePositioner> {
        self.positioners.get_mut(key)
    }

    /// Positioner for `key`, created on first touch
    pub fn get_or_create(&mut self, key: &PositionerKey, cross_staff: bool) -> &mut CurvePositioner {
        self.positioners.entry(key.clone()).or_insert_with(|| {
            log::debug!("Creating positioner for {} segment {}", key.element, key.segment);
            CurvePositioner::new(cross_staff)
        })
    }

    pub fn len(&self) -> usize {
        self.positioners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positioners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionerKey, &CurvePositioner)> {
        self.positioners.iter()
    }

    /// Register a curve with the spanned elements that place themselves around it
    pub fn register_articulations(&mut self, key: &PositionerKey) {
        let Some(positioner) = self.positioners.get(key) else {
            return;
        };
        let side = match positioner.direction() {
            CurveDirection::Above => super::CurveSide::Above,
            CurveDirection::Below => super::CurveSide::Below,
            CurveDirection::Undetermined => return,
        };
        let avoiding: Vec<ElementId> = positioner
            .spanned_elements()
            .iter()
            .filter(|s| s.avoids_curves && s.side == side)
            .map(|s| s.element.clone())
            .collect();

        for element in avoiding {
            let keys = self.avoidance.entry(element).or_default();
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }

    /// Curves the given articulation/fermata has to avoid
    pub fn curves_avoided_by(&self, element: &ElementId) -> &[PositionerKey] {
        self.avoidance.get(element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reset every positioner to the undetermined state, keeping the entries
    pub fn reset_all(&mut self) {
        for positioner in self.positioners.values_mut() {
            positioner.reset();
        }
        self.avoidance.clear();
    }

    /// Drop all layout state
    pub fn clear(&mut self) {
        self.positioners.clear();
        self.avoidance.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveSide;
    use crate::models::Rect;

    fn key(id: &str, segment: usize) -> PositionerKey {
        PositionerKey::new(ElementId::new(id), segment)
    }

    fn spanned(id: &str, side: CurveSide, avoids: bool) -> SpannedElement {
        SpannedElement {
            element: ElementId::new(id),
            bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
            side,
            avoids_curves: avoids,
        }
    }

    #[test]
    fn test_new_positioner_is_undetermined() {
        let positioner = CurvePositioner::new(false);
        assert_eq!(positioner.direction(), CurveDirection::Undetermined);
        assert!(!positioner.is_cross_staff());
        assert!(positioner.spanned_elements().is_empty());
        assert_eq!(positioner.calculation_count(), 0);
    }

    #[test]
    fn test_spanned_elements_are_deduplicated_in_order() {
        let mut positioner = CurvePositioner::new(false);
        positioner.add_spanned_elements(vec![
            spanned("a", CurveSide::Above, false),
            spanned("b", CurveSide::Below, false),
        ]);
        positioner.add_spanned_elements(vec![spanned("a", CurveSide::Above, false)]);
        let ids: Vec<&str> = positioner.spanned_elements().iter().map(|s| s.element.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_reset_returns_to_undetermined() {
        let mut positioner = CurvePositioner::new(true);
        positioner.set_curve(CubicBez::new((0.0, 30.0), (20.0, 10.0), (80.0, 10.0), (100.0, 30.0)));
        positioner.set_direction(CurveDirection::Below);
        positioner.set_thickness(5.4);
        positioner.add_spanned_elements(vec![spanned("a", CurveSide::Below, false)]);
        positioner.mark_calculated(false);
        assert!(positioner.is_determined());

        positioner.reset();
        assert_eq!(positioner.direction(), CurveDirection::Undetermined);
        assert!(!positioner.is_determined());
        assert!(positioner.spanned_elements().is_empty());
        assert_eq!(positioner.calculation_count(), 0);
        assert!(positioner.is_resolved());
        assert_eq!(positioner.thickness(), 0.0);
        assert_eq!(positioner.points(), [Point::ZERO; 4]);
        assert!(positioner.is_cross_staff());
    }

    #[test]
    fn test_arena_get_or_create_is_lazy_and_stable() {
        let mut arena = PositionerArena::new();
        assert!(arena.get(&key("sl1", 0)).is_none());
        arena.get_or_create(&key("sl1", 0), false).set_direction(CurveDirection::Above);
        assert_eq!(arena.len(), 1);
        let again = arena.get_or_create(&key("sl1", 0), true);
        assert_eq!(again.direction(), CurveDirection::Above);
        assert!(!again.is_cross_staff());
    }

    #[test]
    fn test_register_articulations_on_curve_side_only() {
        let mut arena = PositionerArena::new();
        let k = key("sl1", 0);
        let positioner = arena.get_or_create(&k, false);
        positioner.set_direction(CurveDirection::Above);
        positioner.add_spanned_elements(vec![
            spanned("artic-above", CurveSide::Above, true),
            spanned("artic-below", CurveSide::Below, true),
            spanned("note", CurveSide::Above, false),
        ]);
        arena.register_articulations(&k);
        arena.register_articulations(&k);

        assert_eq!(arena.curves_avoided_by(&ElementId::new("artic-above")), &[k.clone()]);
        assert!(arena.curves_avoided_by(&ElementId::new("artic-below")).is_empty());
        assert!(arena.curves_avoided_by(&ElementId::new("note")).is_empty());

        arena.clear();
        assert!(arena.is_empty());
        assert!(arena.curves_avoided_by(&ElementId::new("artic-above")).is_empty());
    }
}
