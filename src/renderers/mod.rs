//! Renderers module for the engraver
//!
//! Device contexts (measurement, display list, SVG), the curve renderer and
//! the layout engine that drives both passes over them.

pub mod bbox;
pub mod curve_renderer;
pub mod device;
pub mod display_list;
pub mod font_utils;
pub mod layout_engine;
pub mod svg;
pub mod view;

// Re-export commonly used types
pub use bbox::BBoxDeviceContext;
pub use curve_renderer::{pen_for, CurveRenderer, RenderedSegment};
pub use device::{DeviceContext, GroupId, PenStyle, ThickBezier};
pub use display_list::{DisplayList, DrawCommand, RecordingDeviceContext};
pub use layout_engine::LayoutEngine;
pub use svg::SvgDeviceContext;
pub use view::{DrawnSegment, View};
