//! Display list for curve rendering
//!
//! The recording device context stores every drawing call as a
//! [`DrawCommand`]. The resulting [`DisplayList`] is returned to JavaScript,
//! which draws it without any further layout calculation.

use serde::{Deserialize, Serialize};

use super::device::{DeviceContext, GroupId, PenStyle, ThickBezier};
use crate::models::geometry::control_points;
use crate::models::{CubicBez, ElementId, Point};

/// One recorded drawing call
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    StartGroup {
        group: GroupId,
        owner: ElementId,
    },
    ResumeGroup {
        group: GroupId,
    },
    EndGroup,
    EndResumedGroup,
    StrokeBezier {
        points: [Point; 4],
        width: f64,
        style: PenStyle,
    },
    FillThickBezier(ThickBezier),
}

/// Recorded drawing calls, in call order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drawing commands only, without group bookkeeping
    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| {
            matches!(
                c,
                DrawCommand::StrokeBezier { .. } | DrawCommand::FillThickBezier(_)
            )
        })
    }
}

/// Device context that records into a [`DisplayList`]
#[derive(Debug, Default)]
pub struct RecordingDeviceContext {
    list: DisplayList,
    next_group: u32,
}

impl RecordingDeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    pub fn into_display_list(self) -> DisplayList {
        self.list
    }
}

impl DeviceContext for RecordingDeviceContext {
    fn is_measurement(&self) -> bool {
        false
    }

    fn start_group(&mut self, owner: &ElementId) -> GroupId {
        let group = GroupId(self.next_group);
        self.next_group += 1;
        self.list.commands.push(DrawCommand::StartGroup {
            group,
            owner: owner.clone(),
        });
        group
    }

    fn resume_group(&mut self, group: GroupId) {
        self.list.commands.push(DrawCommand::ResumeGroup { group });
    }

    fn end_group(&mut self) {
        self.list.commands.push(DrawCommand::EndGroup);
    }

    fn end_resumed_group(&mut self) {
        self.list.commands.push(DrawCommand::EndResumedGroup);
    }

    fn stroke_bezier(&mut self, curve: &CubicBez, width: f64, style: PenStyle) {
        self.list.commands.push(DrawCommand::StrokeBezier {
            points: control_points(curve),
            width,
            style,
        });
    }

    fn fill_thick_bezier(&mut self, ribbon: &ThickBezier) {
        self.list.commands.push(DrawCommand::FillThickBezier(ribbon.clone()));
    }
}
