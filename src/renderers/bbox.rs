//! Measurement device context
//!
//! Draws nothing. The exact extent of every curve is added to the bounding
//! box of the group (and owner) it was drawn in.

use std::collections::BTreeMap;

use kurbo::ParamCurveExtrema;

use super::device::{DeviceContext, GroupId, PenStyle, ThickBezier};
use crate::models::{CubicBez, ElementId, Rect};

#[derive(Debug, Default)]
pub struct BBoxDeviceContext {
    next_group: u32,
    owners: BTreeMap<GroupId, ElementId>,
    stack: Vec<GroupId>,
    boxes: BTreeMap<ElementId, Rect>,
    extent: Option<Rect>,
}

impl BBoxDeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated extent of everything drawn for `owner`
    pub fn bounding_box(&self, owner: &ElementId) -> Option<Rect> {
        self.boxes.get(owner).copied()
    }

    /// Accumulated extent of everything drawn
    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    fn add(&mut self, bbox: Rect) {
        self.extent = Some(match self.extent {
            Some(extent) => extent.union(bbox),
            None => bbox,
        });

        let Some(owner) = self.stack.last().and_then(|g| self.owners.get(g)) else {
            return;
        };
        self.boxes
            .entry(owner.clone())
            .and_modify(|b| *b = b.union(bbox))
            .or_insert(bbox);
    }
}

impl DeviceContext for BBoxDeviceContext {
    fn is_measurement(&self) -> bool {
        true
    }

    fn start_group(&mut self, owner: &ElementId) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        self.owners.insert(id, owner.clone());
        self.stack.push(id);
        id
    }

    fn resume_group(&mut self, group: GroupId) {
        self.stack.push(group);
    }

    fn end_group(&mut self) {
        self.stack.pop();
    }

    fn end_resumed_group(&mut self) {
        self.stack.pop();
    }

    fn stroke_bezier(&mut self, curve: &CubicBez, width: f64, _style: PenStyle) {
        let half = width / 2.0;
        self.add(curve.bounding_box().inflate(half, half));
    }

    fn fill_thick_bezier(&mut self, ribbon: &ThickBezier) {
        let half = ribbon.pen_width / 2.0;
        let bbox = ribbon
            .top_curve()
            .bounding_box()
            .union(ribbon.bottom_curve().bounding_box())
            .inflate(half, half);
        self.add(bbox);
    }
}
