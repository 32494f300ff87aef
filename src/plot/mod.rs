//! Chart rendering.
//!
//! - `ascii`: terminal charts (deterministic, golden-testable)
//! - `svg`: SVG files via Plotters, mirroring the saved-figure workflow

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
