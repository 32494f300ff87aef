//! Mathematical utilities: basis functions, least squares, spline
//! interpolation, and the correlation/PCA decomposition.

pub mod basis;
pub mod ols;
pub mod pca;
pub mod spline;

pub use basis::*;
pub use ols::*;
pub use pca::*;
pub use spline::*;
