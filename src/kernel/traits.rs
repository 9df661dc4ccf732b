//! Kernel trait definition

use crate::core::types::{GramMatrix, Parameters};

/// Kernel function trait
///
/// A kernel K(x, y) must satisfy Mercer's condition to induce a valid Gram
/// matrix; the engine treats kernels as black-box similarity functions and
/// does not enforce positive semi-definiteness.
pub trait Kernel: Send + Sync {
    /// Kernel identifier as registered in the kernel registry
    fn name(&self) -> &'static str;

    /// Bound parameter set (declared defaults merged with overrides)
    fn parameters(&self) -> &Parameters;

    /// Compute the similarity K(a, b) between two samples
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64;

    /// Compute the symmetric Gram matrix over one sample set.
    ///
    /// The default fills the upper triangle pairwise and mirrors it.
    fn gram(&self, samples: &[Vec<f64>]) -> GramMatrix {
        let n = samples.len();
        let mut gram = GramMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let value = self.similarity(&samples[i], &samples[j]);
                gram.set(i, j, value);
                gram.set(j, i, value);
            }
        }
        gram
    }

    /// Compute the rectangular block K(rows[i], cols[j]), used to evaluate
    /// held-out points against training points.
    fn cross_gram(&self, rows: &[Vec<f64>], cols: &[Vec<f64>]) -> GramMatrix {
        let mut block = GramMatrix::zeros(rows.len(), cols.len());
        for (i, a) in rows.iter().enumerate() {
            for (j, b) in cols.iter().enumerate() {
                block.set(i, j, self.similarity(a, b));
            }
        }
        block
    }
}

/// Dot product between two dense vectors
///
/// Shared by the linear kernel and the distance-based kernels.
pub(crate) fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Squared Euclidean distance ||a - b||^2
pub(crate) fn squared_euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}
