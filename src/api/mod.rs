//! Engraver WASM API
//!
//! JavaScript-facing entry points. Every function takes a serialized
//! [`ScoreLayout`](crate::models::ScoreLayout) and optional engraving options
//! (`undefined`/`null` means defaults).
//!
//! # Module Structure
//!
//! - `helpers`: serialization and error conversion shared by all functions
//! - `curves`: curve rendering, analysis and symbol lookup

pub mod helpers;
pub mod curves;

pub use curves::{analyze_curves, fermata_glyph, key_accid_symbol, render_curves, render_curves_svg};
