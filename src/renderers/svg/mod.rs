//! SVG device context
//!
//! Writes drawing calls as SVG paths with `quick-xml`. Groups become `<g>`
//! elements tagged with their owner; a resumed group opens a new `<g>` that
//! points back at the group it continues, since SVG cannot re-open an element.

use kurbo::{BezPath, PathEl};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::device::{DeviceContext, GroupId, PenStyle, ThickBezier};
use crate::errors::RenderError;
use crate::models::{CubicBez, ElementId, Point};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub struct SvgDeviceContext {
    writer: Writer<Vec<u8>>,
    next_group: u32,
    /// First write failure; reported by [`SvgDeviceContext::finish`]
    error: Option<RenderError>,
}

impl SvgDeviceContext {
    /// Start a document of the given size in device units
    pub fn new(width: f64, height: f64) -> Result<Self, RenderError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let (w, h) = (fmt(width.max(0.0)), fmt(height.max(0.0)));
        let view_box = format!("0 0 {} {}", w, h);
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NS));
        svg.push_attribute(("width", w.as_str()));
        svg.push_attribute(("height", h.as_str()));
        svg.push_attribute(("viewBox", view_box.as_str()));
        writer.write_event(Event::Start(svg))?;

        Ok(Self {
            writer,
            next_group: 0,
            error: None,
        })
    }

    /// Close the document and return the SVG text
    pub fn finish(mut self) -> Result<String, RenderError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
        String::from_utf8(self.writer.into_inner()).map_err(|e| RenderError::Svg(e.to_string()))
    }

    fn write(&mut self, event: Event<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.writer.write_event(event) {
            log::warn!("SVG write failed: {}", e);
            self.error = Some(e.into());
        }
    }

    fn open_group(&mut self, attributes: &[(&str, &str)]) {
        let mut g = BytesStart::new("g");
        for attribute in attributes {
            g.push_attribute(*attribute);
        }
        self.write(Event::Start(g));
    }

    fn close_group(&mut self) {
        self.write(Event::End(BytesEnd::new("g")));
    }
}

impl DeviceContext for SvgDeviceContext {
    fn is_measurement(&self) -> bool {
        false
    }

    fn start_group(&mut self, owner: &ElementId) -> GroupId {
        let group = GroupId(self.next_group);
        self.next_group += 1;
        let id = group_id(group);
        self.open_group(&[("id", id.as_str()), ("data-owner", owner.as_str())]);
        group
    }

    fn resume_group(&mut self, group: GroupId) {
        let id = group_id(group);
        self.open_group(&[("data-resumes", id.as_str())]);
    }

    fn end_group(&mut self) {
        self.close_group();
    }

    fn end_resumed_group(&mut self) {
        self.close_group();
    }

    fn stroke_bezier(&mut self, curve: &CubicBez, width: f64, style: PenStyle) {
        let mut outline = BezPath::new();
        outline.move_to(curve.p0);
        outline.curve_to(curve.p1, curve.p2, curve.p3);
        let d = path_data(&outline);
        let dash = style.dash_array(width);
        let width = fmt(width);

        let mut path = BytesStart::new("path");
        path.push_attribute(("d", d.as_str()));
        path.push_attribute(("fill", "none"));
        path.push_attribute(("stroke", "currentColor"));
        path.push_attribute(("stroke-width", width.as_str()));
        path.push_attribute(("stroke-linecap", "round"));
        if let Some(dash) = dash.as_deref() {
            path.push_attribute(("stroke-dasharray", dash));
        }
        self.write(Event::Empty(path));
    }

    fn fill_thick_bezier(&mut self, ribbon: &ThickBezier) {
        // top left to right, then bottom back right to left
        let [t0, t1, t2, t3] = ribbon.top;
        let [b0, b1, b2, _] = ribbon.bottom;
        let mut outline = BezPath::new();
        outline.move_to(t0);
        outline.curve_to(t1, t2, t3);
        outline.curve_to(b2, b1, b0);
        outline.close_path();
        let d = path_data(&outline);
        let width = fmt(ribbon.pen_width);

        let mut path = BytesStart::new("path");
        path.push_attribute(("d", d.as_str()));
        path.push_attribute(("fill", "currentColor"));
        path.push_attribute(("stroke", "currentColor"));
        path.push_attribute(("stroke-width", width.as_str()));
        path.push_attribute(("stroke-linejoin", "round"));
        self.write(Event::Empty(path));
    }
}

fn group_id(group: GroupId) -> String {
    format!("g{}", group.0)
}

fn fmt(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn pt(p: Point) -> String {
    format!("{},{}", fmt(p.x), fmt(p.y))
}

fn path_data(path: &BezPath) -> String {
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => format!("M{}", pt(p)),
            PathEl::LineTo(p) => format!("L{}", pt(p)),
            PathEl::QuadTo(a, p) => format!("Q{} {}", pt(a), pt(p)),
            PathEl::CurveTo(a, b, p) => format!("C{} {} {}", pt(a), pt(b), pt(p)),
            PathEl::ClosePath => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> CubicBez {
        CubicBez::new((0.0, 100.0), (20.0, 80.0), (80.0, 80.0), (100.0, 100.0))
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(1.25), "1.25");
        assert_eq!(fmt(0.333333), "0.33");
        assert_eq!(fmt(-0.001), "0");
    }

    #[test]
    fn test_stroke_path_and_dash() {
        let mut dc = SvgDeviceContext::new(200.0, 150.0).unwrap();
        dc.start_group(&ElementId::new("sl1"));
        dc.stroke_bezier(&arch(), 1.0, PenStyle::ShortDash);
        dc.end_group();
        let svg = dc.finish().unwrap();

        assert!(svg.contains(r#"viewBox="0 0 200 150""#));
        assert!(svg.contains(r#"data-owner="sl1""#));
        assert!(svg.contains(r#"d="M0,100 C20,80 80,80 100,100""#));
        assert!(svg.contains(r#"stroke-dasharray="4.00 3.00""#));
    }

    #[test]
    fn test_ribbon_is_closed_path() {
        let mut dc = SvgDeviceContext::new(100.0, 100.0).unwrap();
        let (top, bottom) = crate::curves::bezier::thick_envelope(&arch(), 4.0);
        dc.fill_thick_bezier(&ThickBezier::new(&top, &bottom, 0.9));
        let svg = dc.finish().unwrap();
        assert!(svg.contains(r#"d="M0,100 C20,78 80,78 100,100 C80,82 20,82 0,100 Z""#));
        assert!(svg.contains(r#"fill="currentColor""#));
    }
}
