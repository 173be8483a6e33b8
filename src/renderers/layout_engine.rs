//! Layout Engine - drives the two-pass curve layout cycle
//!
//! A cycle is a measurement pass, in which undetermined curves are solved and
//! their extents collected, followed by a final pass that draws the cached
//! geometry into an output context. Between the two passes the caller may
//! move staves vertically (justification): single-staff curves follow their
//! staff unchanged, cross-staff curves are solved again.

use std::collections::BTreeMap;

use super::bbox::BBoxDeviceContext;
use super::device::{DeviceContext, GroupId};
use super::display_list::{DisplayList, RecordingDeviceContext};
use super::svg::SvgDeviceContext;
use super::view::{DrawnSegment, View};
use crate::config::EngravingOptions;
use crate::curves::{CurveHandling, CurveSolution, PositionerArena, PositionerKey};
use crate::errors::{CurveError, RenderError};
use crate::models::{Point, Rect, ScoreLayout};

/// Margin around the drawing, in drawing units
const PAGE_MARGIN_UNITS: f64 = 4.0;

/// Owns the curve layout state across passes
#[derive(Debug, Default)]
pub struct LayoutEngine {
    options: EngravingOptions,
    arena: PositionerArena,
    solutions: BTreeMap<PositionerKey, CurveSolution>,
    extent: Option<Rect>,
}

impl LayoutEngine {
    pub fn new(options: EngravingOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &EngravingOptions {
        &self.options
    }

    pub fn arena(&self) -> &PositionerArena {
        &self.arena
    }

    /// Latest solution of every segment solved in this cycle
    pub fn solutions(&self) -> &BTreeMap<PositionerKey, CurveSolution> {
        &self.solutions
    }

    /// Extent of all curves found by the last measurement pass
    pub fn measured_extent(&self) -> Option<Rect> {
        self.extent
    }

    /// Measurement pass: solve undetermined curves and size them
    pub fn measure(&mut self, layout: &ScoreLayout) -> Result<Vec<DrawnSegment>, CurveError> {
        let mut dc = BBoxDeviceContext::new();
        let drawn = self.draw(layout, &mut dc, CurveHandling::Initialize)?;
        self.extent = dc.extent();
        log::debug!("Measured {} curve segments", drawn.len());
        Ok(drawn)
    }

    /// Draw every curve of `layout` into `dc`
    ///
    /// Segments of one curve share a group: the first segment opens it and the
    /// following ones resume it. Curves that cannot be split into segments
    /// are skipped with a warning; `analyze_curves` reports them.
    pub fn draw(
        &mut self,
        layout: &ScoreLayout,
        dc: &mut dyn DeviceContext,
        handling: CurveHandling,
    ) -> Result<Vec<DrawnSegment>, CurveError> {
        let mut drawn = Vec::new();
        let mut view = View::new(layout, &self.options, &mut self.arena, handling);

        for curve in &layout.curves {
            let segments = match layout.segments(curve) {
                Ok(segments) => segments,
                Err(e) => {
                    log::warn!("Skipping curve: {}", e);
                    continue;
                }
            };

            let mut graphic: Option<GroupId> = None;
            for segment in &segments {
                let result = view.draw_curve(dc, curve, segment, graphic)?;
                graphic.get_or_insert(result.rendered.group);
                if let Some(solution) = &result.solution {
                    self.solutions.insert(result.key.clone(), solution.clone());
                }
                drawn.push(result);
            }
        }
        Ok(drawn)
    }

    /// Final pass into a display list
    pub fn render_display_list(&mut self, layout: &ScoreLayout) -> Result<DisplayList, RenderError> {
        let mut dc = RecordingDeviceContext::new();
        self.draw(layout, &mut dc, CurveHandling::Reuse)?;
        Ok(dc.into_display_list())
    }

    /// Final pass into an SVG document
    pub fn render_svg(&mut self, layout: &ScoreLayout) -> Result<String, RenderError> {
        let page = self.page_box(layout);
        let mut dc = SvgDeviceContext::new(page.x1, page.y1)?;
        self.draw(layout, &mut dc, CurveHandling::Reuse)?;
        dc.finish()
    }

    /// Measurement and final pass over an unchanged layout
    pub fn render(&mut self, layout: &ScoreLayout) -> Result<DisplayList, RenderError> {
        self.measure(layout)?;
        self.render_display_list(layout)
    }

    /// Horizontal spacing changed: curves have to be solved again
    ///
    /// A measurement pass must run before the next final pass; until then
    /// drawing reports [`CurveError::MissingLayoutState`].
    pub fn rejustify(&mut self) {
        log::debug!("Resetting {} curve positioners", self.arena.len());
        self.arena.reset_all();
        self.solutions.clear();
    }

    /// Drop all layout state (document edited)
    pub fn invalidate_layout(&mut self) {
        self.arena.clear();
        self.solutions.clear();
        self.extent = None;
    }

    fn page_box(&self, layout: &ScoreLayout) -> Rect {
        let margin = PAGE_MARGIN_UNITS * self.options.unit;
        let mut page = Rect::ZERO;
        for system in &layout.systems {
            page = page.union_pt(Point::new(system.right + margin, 0.0));
            for staff in &system.staves {
                page = page.union_pt(Point::new(0.0, staff.bottom(self.options.unit) + margin));
            }
        }
        if let Some(extent) = self.extent {
            page = page.union(extent.inflate(margin, margin));
        }
        page
    }
}
