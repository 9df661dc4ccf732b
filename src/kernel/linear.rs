//! Linear kernel implementation

use crate::core::types::Parameters;
use crate::kernel::traits::{dot_product, Kernel};

/// Linear kernel: K(x, y) = x^T * y
///
/// The simplest kernel; it declares no tunable parameters.
#[derive(Debug, Clone)]
pub struct LinearKernel {
    parameters: Parameters,
}

impl LinearKernel {
    pub const DEFAULTS: &'static [(&'static str, f64)] = &[];

    /// Create a new linear kernel
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_defaults(Self::DEFAULTS),
        }
    }
}

impl Default for LinearKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for LinearKernel {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        dot_product(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_kernel_basic() {
        let kernel = LinearKernel::new();
        assert_eq!(kernel.similarity(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
    }

    #[test]
    fn test_linear_kernel_identical() {
        let kernel = LinearKernel::new();
        // x^T * x = 1 + 4 + 9 = 14
        assert_eq!(kernel.similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 14.0);
    }

    #[test]
    fn test_linear_kernel_gram_symmetric() {
        let kernel = LinearKernel::new();
        let samples = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let gram = kernel.gram(&samples);

        assert_eq!(gram.rows(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(gram.get(i, j), gram.get(j, i));
            }
        }
        assert_eq!(gram.get(0, 2), 1.0);
        assert_eq!(gram.get(2, 2), 2.0);
    }

    #[test]
    fn test_linear_kernel_cross_gram() {
        let kernel = LinearKernel::new();
        let rows = vec![vec![2.0, 0.0]];
        let cols = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![3.0, 1.0]];
        let block = kernel.cross_gram(&rows, &cols);

        assert_eq!(block.rows(), 1);
        assert_eq!(block.cols(), 3);
        assert_eq!(block.row(0), &[2.0, 0.0, 6.0]);
    }

    #[test]
    fn test_linear_kernel_no_parameters() {
        let kernel = LinearKernel::new();
        assert!(kernel.parameters().names().is_empty());
    }
}
