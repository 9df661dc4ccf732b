//! Dual quadratic-program solvers
//!
//! The KSVM consumes any solver satisfying the [`QpSolver`] contract; the
//! bundled implementation is Sequential Minimal Optimization over the
//! precomputed Gram matrix.

pub mod smo;

pub use self::smo::*;

use crate::core::error::Result;
use crate::core::types::GramMatrix;

/// Solution of the box-constrained SVM dual
#[derive(Debug, Clone)]
pub struct QpSolution {
    /// Unsigned dual variables, each in [0, C]
    pub alpha: Vec<f64>,
    /// Outer iterations the solver performed
    pub iterations: usize,
}

/// Contract for solvers of the soft-margin SVM dual:
///
/// minimize  ½ xᵀ(DyKDy)x − 1ᵀx
/// subject to 0 ≤ xᵢ ≤ C and yᵀ(Dy x) = 0, with Dy = diag(y).
///
/// Implementations must return variables at the optimum (within their own
/// tolerance) or fail with `Optimization`; they must never silently return a
/// zero vector on failure.
pub trait QpSolver {
    fn solve(&self, gram: &GramMatrix, labels: &[f64], c: f64) -> Result<QpSolution>;
}
