//! Data acquisition.
//!
//! - `fred`: FRED API client plus snapshot/panel assembly over any
//!   [`SeriesSource`] implementation
//! - `sample`: deterministic offline data for running without a key

pub mod fred;
pub mod sample;

pub use fred::*;
pub use sample::*;
