//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the Treasury constant-maturity series table (`TreasuryTenor`)
//! - curve observations and fit outputs (`Observation`, `FittedCurve`, ...)
//! - run configuration for the CLI surfaces

pub mod observations;
pub mod types;

pub use observations::*;
pub use types::*;
