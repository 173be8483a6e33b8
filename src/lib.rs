//! Engraver WASM Module
//!
//! Curve layout for music engraving: slurs, ties and phrasing slurs are
//! shaped around the notation they span, cached across the measurement and
//! final layout passes, and drawn through a device context.

pub mod api;
pub mod config;
pub mod curves;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod renderers;

// Re-export commonly used types
pub use config::EngravingOptions;
pub use errors::{ConfigError, CurveError, RenderError};
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // a logger may already be installed by the host
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Engraver WASM module initialized");
}
