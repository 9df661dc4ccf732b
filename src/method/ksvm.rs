//! Kernel Support Vector Machine
//!
//! Solves the soft-margin dual
//!   minimize  ½ αᵀ(DyKDy)α − 1ᵀα
//!   subject to 0 ≤ yᵢαᵢ ≤ C and yᵀα = 0
//! through a pluggable QP solver, then recovers signed dual coefficients,
//! support vectors and the intercept.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::core::error::{KMethodError, Result};
use crate::core::traits::{check_fit_inputs, KernelMethod};
use crate::core::types::{GramMatrix, Parameters};
use crate::solver::{QpSolver, SMOSolver};

/// Kernel SVM with parameters `C` (box constraint) and `tol` (support-vector
/// threshold).
pub struct KSVM {
    parameters: Parameters,
    solver: Box<dyn QpSolver>,
    state: Option<FittedState>,
}

struct FittedState {
    /// Signed dual coefficients, zero outside the support set
    alpha: Vec<f64>,
    /// Intercept
    b: f64,
    /// Training set size the coefficients refer to
    n: usize,
    /// Set when no support vector cleared the tolerance
    degenerate: bool,
    /// Fallback label for degenerate fits
    majority_label: f64,
}

impl KSVM {
    pub const DEFAULTS: &'static [(&'static str, f64)] = &[("C", 1.0), ("tol", 1e-4)];

    /// Create a KSVM with default parameters and the bundled SMO solver
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_defaults(Self::DEFAULTS),
            solver: Box::new(SMOSolver::default()),
            state: None,
        }
    }

    /// Create a KSVM with overrides merged over the defaults
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self> {
        Ok(Self {
            parameters: Parameters::with_overrides(Self::DEFAULTS, overrides)?,
            solver: Box::new(SMOSolver::default()),
            state: None,
        })
    }

    /// Replace the QP solver collaborator
    pub fn with_solver(mut self, solver: Box<dyn QpSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Signed dual coefficients of the fitted model
    pub fn alpha(&self) -> Result<&[f64]> {
        self.state
            .as_ref()
            .map(|s| s.alpha.as_slice())
            .ok_or(KMethodError::NotFitted)
    }

    /// Intercept of the fitted model
    pub fn intercept(&self) -> Result<f64> {
        self.state.as_ref().map(|s| s.b).ok_or(KMethodError::NotFitted)
    }

    /// Indices with non-zero dual coefficient
    pub fn support_vector_indices(&self) -> Result<Vec<usize>> {
        let state = self.state.as_ref().ok_or(KMethodError::NotFitted)?;
        Ok(state
            .alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| (a != 0.0).then_some(i))
            .collect())
    }

    /// Whether the fit found no support vectors
    pub fn is_degenerate(&self) -> Result<bool> {
        self.state
            .as_ref()
            .map(|s| s.degenerate)
            .ok_or(KMethodError::NotFitted)
    }

    /// Raw decision values Σⱼ αⱼ·K[row, j] + b for each row of a cross-Gram
    /// block whose columns index the training samples.
    pub fn decision_function(&self, cross: &GramMatrix) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(KMethodError::NotFitted)?;
        if cross.cols() != state.n {
            return Err(KMethodError::Dimension {
                expected: state.n,
                actual: cross.cols(),
            });
        }

        let values = (0..cross.rows())
            .map(|i| {
                let row = cross.row(i);
                let weighted: f64 = state
                    .alpha
                    .iter()
                    .zip(row.iter())
                    .map(|(&a, &k)| a * k)
                    .sum();
                weighted + state.b
            })
            .collect();
        Ok(values)
    }
}

impl Default for KSVM {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelMethod for KSVM {
    fn name(&self) -> &'static str {
        "ksvm"
    }

    fn fit(&mut self, gram: &GramMatrix, labels: &[f64]) -> Result<()> {
        check_fit_inputs(gram, labels)?;
        let c = self.parameters.get("C")?;
        let tol = self.parameters.get("tol")?;
        let n = labels.len();

        // Refitting replaces prior state; clear it up front so a solver
        // failure leaves the model unfitted rather than stale.
        self.state = None;

        let solution = self.solver.solve(gram, labels, c)?;

        // Recover signed coefficients from the solver's box variables
        let mut alpha: Vec<f64> = solution
            .alpha
            .iter()
            .zip(labels.iter())
            .map(|(&x, &y)| y * x)
            .collect();

        let support_vectors: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| (a.abs() > tol).then_some(i))
            .collect();

        // Intercept: average the margin residual over the support set
        let mut b = 0.0;
        for &sv in &support_vectors {
            b += labels[sv];
            b -= support_vectors
                .iter()
                .map(|&j| alpha[j] * gram.get(sv, j))
                .sum::<f64>();
        }
        if !support_vectors.is_empty() {
            b /= support_vectors.len() as f64;
        }

        // Enforce sparsity outside the support set
        for a in alpha.iter_mut() {
            if a.abs() <= tol {
                *a = 0.0;
            }
        }

        let degenerate = support_vectors.is_empty();
        let positives = labels.iter().filter(|&&y| y > 0.0).count();
        let majority_label = if 2 * positives >= n { 1.0 } else { -1.0 };

        if degenerate {
            warn!("KSVM fit found no support vectors; predictions fall back to the majority label");
        } else {
            info!(
                "KSVM fit: n={}, C={}, {} support vectors, intercept={:.6}",
                n,
                c,
                support_vectors.len(),
                b
            );
        }

        self.state = Some(FittedState {
            alpha,
            b: if degenerate { 0.0 } else { b },
            n,
            degenerate,
            majority_label,
        });
        Ok(())
    }

    fn predict(&self, cross: &GramMatrix) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(KMethodError::NotFitted)?;
        if state.degenerate {
            if cross.cols() != state.n {
                return Err(KMethodError::Dimension {
                    expected: state.n,
                    actual: cross.cols(),
                });
            }
            return Ok(vec![state.majority_label; cross.rows()]);
        }

        let labels = self
            .decision_function(cross)?
            .into_iter()
            .map(|value| if value >= 0.0 { 1.0 } else { -1.0 })
            .collect();
        Ok(labels)
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::kernel::{Kernel, LinearKernel};
    use crate::solver::QpSolution;

    /// Stub solver that returns a fixed vector, for exercising
    /// post-processing in isolation.
    struct FixedSolver(Vec<f64>);

    impl QpSolver for FixedSolver {
        fn solve(&self, _gram: &GramMatrix, _labels: &[f64], _c: f64) -> Result<QpSolution> {
            Ok(QpSolution {
                alpha: self.0.clone(),
                iterations: 0,
            })
        }
    }

    struct FailingSolver;

    impl QpSolver for FailingSolver {
        fn solve(&self, _gram: &GramMatrix, _labels: &[f64], _c: f64) -> Result<QpSolution> {
            Err(KMethodError::Optimization("infeasible".to_string()))
        }
    }

    fn separable_clusters() -> (Vec<Vec<f64>>, Vec<f64>) {
        (
            vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![-1.0, 0.0], vec![-2.0, 0.0]],
            vec![1.0, 1.0, -1.0, -1.0],
        )
    }

    #[test]
    fn test_ksvm_separable_clusters_support_vectors() {
        let (samples, labels) = separable_clusters();
        let gram = LinearKernel::new().gram(&samples);

        let mut svm = KSVM::new();
        svm.fit(&gram, &labels).unwrap();

        // Only the two boundary points carry non-zero coefficients
        assert_eq!(svm.support_vector_indices().unwrap(), vec![0, 2]);
        let alpha = svm.alpha().unwrap();
        assert_relative_eq!(alpha[0], 0.5, epsilon = 1e-4);
        assert_relative_eq!(alpha[2], -0.5, epsilon = 1e-4);
        assert_eq!(alpha[1], 0.0);
        assert_eq!(alpha[3], 0.0);
        assert_relative_eq!(svm.intercept().unwrap(), 0.0, epsilon = 1e-4);

        // Training labels reproduced exactly
        let predictions = svm.predict(&gram).unwrap();
        assert_eq!(predictions, labels);
    }

    #[test]
    fn test_ksvm_dual_feasibility() {
        let (samples, labels) = separable_clusters();
        let gram = LinearKernel::new().gram(&samples);
        let c = 1.0;

        let mut svm = KSVM::new();
        svm.fit(&gram, &labels).unwrap();

        let alpha = svm.alpha().unwrap();
        let mut balance = 0.0;
        for (&a, &y) in alpha.iter().zip(labels.iter()) {
            // With signed coefficients, y_i * alpha_i recovers the solver's
            // box variable and the coefficients themselves sum to zero.
            let boxed = y * a;
            assert!(boxed >= -1e-6, "0 <= y_i * alpha_i violated");
            assert!(boxed <= c + 1e-6, "y_i * alpha_i <= C violated");
            balance += a;
        }
        assert_relative_eq!(balance, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ksvm_fit_idempotent() {
        let (samples, labels) = separable_clusters();
        let gram = LinearKernel::new().gram(&samples);

        let mut svm = KSVM::new();
        svm.fit(&gram, &labels).unwrap();
        let first_alpha = svm.alpha().unwrap().to_vec();
        let first_b = svm.intercept().unwrap();

        svm.fit(&gram, &labels).unwrap();
        assert_eq!(svm.alpha().unwrap(), first_alpha.as_slice());
        assert_eq!(svm.intercept().unwrap(), first_b);
    }

    #[test]
    fn test_ksvm_predict_before_fit() {
        let svm = KSVM::new();
        let cross = GramMatrix::zeros(1, 4);
        assert!(matches!(svm.predict(&cross), Err(KMethodError::NotFitted)));
    }

    #[test]
    fn test_ksvm_fit_shape_mismatch() {
        let mut svm = KSVM::new();
        let gram = GramMatrix::zeros(3, 3);
        let result = svm.fit(&gram, &[1.0, -1.0]);
        assert!(matches!(result, Err(KMethodError::Dimension { .. })));
    }

    #[test]
    fn test_ksvm_predict_column_mismatch() {
        let (samples, labels) = separable_clusters();
        let gram = LinearKernel::new().gram(&samples);
        let mut svm = KSVM::new();
        svm.fit(&gram, &labels).unwrap();

        let cross = GramMatrix::zeros(1, 3);
        assert!(matches!(
            svm.predict(&cross),
            Err(KMethodError::Dimension { .. })
        ));
    }

    #[test]
    fn test_ksvm_degenerate_fit_majority_fallback() {
        // All-zero solver output: no support vectors survive the tolerance
        let mut svm = KSVM::new().with_solver(Box::new(FixedSolver(vec![0.0; 4])));
        let gram = GramMatrix::zeros(4, 4);
        let labels = [1.0, 1.0, 1.0, -1.0];
        svm.fit(&gram, &labels).unwrap();

        assert!(svm.is_degenerate().unwrap());
        assert_eq!(svm.intercept().unwrap(), 0.0);

        let cross = GramMatrix::zeros(2, 4);
        assert_eq!(svm.predict(&cross).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_ksvm_solver_failure_propagates() {
        let mut svm = KSVM::new().with_solver(Box::new(FailingSolver));
        let gram = GramMatrix::zeros(2, 2);
        let result = svm.fit(&gram, &[1.0, -1.0]);

        assert!(matches!(result, Err(KMethodError::Optimization(_))));
        // A failed solve must not leave coefficients behind
        assert!(!svm.is_fitted());
    }

    #[test]
    fn test_ksvm_unknown_parameter_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("n_neighbors".to_string(), 3.0);
        assert!(KSVM::with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_ksvm_sub_tolerance_coefficients_zeroed() {
        // Coefficients at or below tol are removed entirely
        let mut svm = KSVM::new().with_solver(Box::new(FixedSolver(vec![0.5, 1e-5, 0.5, 1e-6])));
        let mut gram = GramMatrix::zeros(4, 4);
        for i in 0..4 {
            gram.set(i, i, 1.0);
        }
        let labels = [1.0, 1.0, -1.0, -1.0];
        svm.fit(&gram, &labels).unwrap();

        let alpha = svm.alpha().unwrap();
        assert!(alpha.iter().all(|&a| a == 0.0 || a.abs() > 1e-4));
        assert_eq!(svm.support_vector_indices().unwrap(), vec![0, 2]);
    }
}
