//! Matrix-vector engine seam.
//!
//! The solver reaches every matrix-vector product through this trait,
//! so the same iteration runs on the in-process reference engine or on
//! a message-passing worker pool. The handle is passed explicitly; no
//! ambient global context exists.

use crate::sparse::CsrMatrix;

pub trait MatVecEngine {
    /// Compute `matrix · x`.
    fn apply(&self, matrix: &CsrMatrix, x: &[f64]) -> Vec<f64>;
}

/// Direct single-process product. Reference implementation and test
/// oracle for distributed engines.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialEngine;

impl MatVecEngine for SerialEngine {
    fn apply(&self, matrix: &CsrMatrix, x: &[f64]) -> Vec<f64> {
        matrix.mul_vec(x)
    }
}
