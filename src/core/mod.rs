//! The dot-plot computation engine.
//!
//! `engine` drives the whole computation; the remaining modules are its
//! parts: alphabets and translation feed the score vector, the scanner
//! folds windowed sums into the pixel map, geometry sizes the grid up
//! front and the mirror step completes self-comparisons.

pub mod alphabet;
pub mod diagnostics;
pub mod diagonal;
pub mod engine;
pub mod gencode;
pub mod geometry;
pub mod matrix;
pub mod mirror;
pub mod pixelmap;
pub mod scanner;
pub mod score_vector;
pub mod translation;
