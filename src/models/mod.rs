//! Nelson–Siegel model implementation.
//!
//! The model is implemented as small, pure functions so that fitting/search
//! code can stay generic over "a design row" and "a prediction".

pub mod ns;

pub use ns::*;
