//! Curve calibration.
//!
//! Responsibilities:
//!
//! - generate the deterministic log-spaced tau grid
//! - evaluate each candidate tau (parallel inner least-squares solves)
//! - refine the winning tau by golden-section search
//!
//! The two-stage structure (linear inner solve, scalar outer search) is the
//! point: the model is linear in the betas for a fixed tau, so the outer
//! problem is one-dimensional and needs no general nonlinear optimizer.

pub mod fitter;
pub mod tau_grid;

pub use fitter::*;
pub use tau_grid::*;
