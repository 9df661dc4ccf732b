//! Sequential Minimal Optimization (SMO) over a precomputed Gram matrix
//!
//! Solves the SVM dual by repeatedly optimizing pairs of dual variables
//! analytically, following Platt's working-set heuristics: an outer loop
//! alternating full and non-bound passes, and a second-choice rule that
//! maximizes |E_i - E_j|.

use log::debug;

use crate::core::error::{KMethodError, Result};
use crate::core::traits::check_fit_inputs;
use crate::core::types::GramMatrix;
use crate::solver::{QpSolution, QpSolver};

/// Configuration for the SMO solver
#[derive(Debug, Clone)]
pub struct SMOConfig {
    /// Tolerance for KKT violation checks
    pub tolerance: f64,
    /// Maximum number of outer passes before declaring non-convergence
    pub max_iterations: usize,
}

impl Default for SMOConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 10_000,
        }
    }
}

/// SMO solver for the soft-margin SVM dual
#[derive(Debug, Clone, Default)]
pub struct SMOSolver {
    config: SMOConfig,
}

impl SMOSolver {
    pub fn new(config: SMOConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SMOConfig {
        &self.config
    }
}

impl QpSolver for SMOSolver {
    fn solve(&self, gram: &GramMatrix, labels: &[f64], c: f64) -> Result<QpSolution> {
        check_fit_inputs(gram, labels)?;
        if !c.is_finite() || c <= 0.0 {
            return Err(KMethodError::Optimization(format!(
                "box constraint C must be positive and finite, got {c}"
            )));
        }

        let mut state = SolverState::new(gram, labels, c, self.config.tolerance);

        let mut iterations = 0;
        let mut num_changed = 0;
        let mut examine_all = true;

        while (num_changed > 0 || examine_all) && iterations < self.config.max_iterations {
            num_changed = 0;

            if examine_all {
                for i in 0..labels.len() {
                    if state.examine_example(i) {
                        num_changed += 1;
                    }
                }
            } else {
                // Only non-bound variables (0 < alpha < C) can still violate KKT
                for i in 0..labels.len() {
                    if state.alpha[i] > 0.0 && state.alpha[i] < c && state.examine_example(i) {
                        num_changed += 1;
                    }
                }
            }

            if examine_all {
                examine_all = false;
            } else if num_changed == 0 {
                examine_all = true;
            }

            iterations += 1;
        }

        if num_changed > 0 || examine_all {
            return Err(KMethodError::Optimization(format!(
                "SMO did not converge within {} iterations",
                self.config.max_iterations
            )));
        }

        debug!(
            "SMO converged after {} passes ({} non-zero variables)",
            iterations,
            state.alpha.iter().filter(|&&a| a > 0.0).count()
        );

        Ok(QpSolution {
            alpha: state.alpha,
            iterations,
        })
    }
}

/// Mutable solver state: dual variables, threshold and the error cache
struct SolverState<'a> {
    gram: &'a GramMatrix,
    labels: &'a [f64],
    c: f64,
    tolerance: f64,
    alpha: Vec<f64>,
    b: f64,
    /// E_i = f(x_i) - y_i, kept exact after every step
    errors: Vec<f64>,
}

impl<'a> SolverState<'a> {
    fn new(gram: &'a GramMatrix, labels: &'a [f64], c: f64, tolerance: f64) -> Self {
        // All alphas start at zero, so f(x_i) = 0 and E_i = -y_i
        let errors = labels.iter().map(|&y| -y).collect();
        Self {
            gram,
            labels,
            c,
            tolerance,
            alpha: vec![0.0; labels.len()],
            b: 0.0,
            errors,
        }
    }

    /// Check KKT conditions at index i and attempt a pairwise step
    fn examine_example(&mut self, i: usize) -> bool {
        let y_i = self.labels[i];
        let alpha_i = self.alpha[i];
        let r_i = self.errors[i] * y_i;

        // KKT violation: alpha can increase (r < -tol) or decrease (r > tol)
        let violates = (r_i < -self.tolerance && alpha_i < self.c)
            || (r_i > self.tolerance && alpha_i > 0.0);
        if !violates {
            return false;
        }

        // Second choice heuristic: maximize |E_i - E_j| over non-bound variables
        if let Some(j) = self.select_second(i) {
            if self.take_step(i, j) {
                return true;
            }
        }

        // Fall back to scanning non-bound variables, then the whole set
        for j in 0..self.labels.len() {
            if j != i && self.alpha[j] > 0.0 && self.alpha[j] < self.c && self.take_step(i, j) {
                return true;
            }
        }
        for j in 0..self.labels.len() {
            if j != i && self.take_step(i, j) {
                return true;
            }
        }

        false
    }

    fn select_second(&self, i: usize) -> Option<usize> {
        let e_i = self.errors[i];
        let mut best = None;
        let mut max_diff = 0.0;

        for j in 0..self.labels.len() {
            if j == i || self.alpha[j] <= 0.0 || self.alpha[j] >= self.c {
                continue;
            }
            let diff = (e_i - self.errors[j]).abs();
            if diff > max_diff {
                max_diff = diff;
                best = Some(j);
            }
        }

        best
    }

    /// Jointly optimize the pair (i, j), keeping the equality constraint
    fn take_step(&mut self, i: usize, j: usize) -> bool {
        if i == j {
            return false;
        }

        let (y_i, y_j) = (self.labels[i], self.labels[j]);
        let (alpha_i, alpha_j) = (self.alpha[i], self.alpha[j]);
        let (e_i, e_j) = (self.errors[i], self.errors[j]);
        let s = y_i * y_j;

        // Feasible segment for alpha_j
        let (low, high) = if (y_i - y_j).abs() > f64::EPSILON {
            (
                (alpha_j - alpha_i).max(0.0),
                (self.c + alpha_j - alpha_i).min(self.c),
            )
        } else {
            (
                (alpha_i + alpha_j - self.c).max(0.0),
                (alpha_i + alpha_j).min(self.c),
            )
        };
        if high - low < f64::EPSILON {
            return false;
        }

        let k_ii = self.gram.get(i, i);
        let k_jj = self.gram.get(j, j);
        let k_ij = self.gram.get(i, j);
        let eta = k_ii + k_jj - 2.0 * k_ij;

        let mut new_alpha_j = if eta > 0.0 {
            (alpha_j + y_j * (e_i - e_j) / eta).clamp(low, high)
        } else {
            // Degenerate curvature: evaluate the objective at both endpoints
            match self.endpoint_objective(i, j, low, high) {
                Some(value) => value,
                None => return false,
            }
        };

        // Snap values near the bounds
        if new_alpha_j < 1e-8 {
            new_alpha_j = 0.0;
        } else if new_alpha_j > self.c - 1e-8 {
            new_alpha_j = self.c;
        }

        if (new_alpha_j - alpha_j).abs() < f64::EPSILON * (new_alpha_j + alpha_j + f64::EPSILON) {
            return false;
        }

        let new_alpha_i = (alpha_i + s * (alpha_j - new_alpha_j)).clamp(0.0, self.c);

        // Threshold update
        let delta_i = new_alpha_i - alpha_i;
        let delta_j = new_alpha_j - alpha_j;
        let b1 = self.b - e_i - y_i * delta_i * k_ii - y_j * delta_j * k_ij;
        let b2 = self.b - e_j - y_i * delta_i * k_ij - y_j * delta_j * k_jj;
        let new_b = if new_alpha_i > 0.0 && new_alpha_i < self.c {
            b1
        } else if new_alpha_j > 0.0 && new_alpha_j < self.c {
            b2
        } else {
            (b1 + b2) / 2.0
        };
        let delta_b = new_b - self.b;

        self.alpha[i] = new_alpha_i;
        self.alpha[j] = new_alpha_j;
        self.b = new_b;

        // Keep the error cache exact: E_k shifts by the change in f(x_k)
        for k in 0..self.labels.len() {
            self.errors[k] +=
                y_i * delta_i * self.gram.get(i, k) + y_j * delta_j * self.gram.get(j, k) + delta_b;
        }

        true
    }

    /// Platt's endpoint evaluation for non-positive curvature: return the
    /// endpoint with the strictly lower objective, if any.
    fn endpoint_objective(&self, i: usize, j: usize, low: f64, high: f64) -> Option<f64> {
        let (y_i, y_j) = (self.labels[i], self.labels[j]);
        let (alpha_i, alpha_j) = (self.alpha[i], self.alpha[j]);
        let (e_i, e_j) = (self.errors[i], self.errors[j]);
        let s = y_i * y_j;

        let k_ii = self.gram.get(i, i);
        let k_jj = self.gram.get(j, j);
        let k_ij = self.gram.get(i, j);

        let f_i = y_i * (e_i + self.b) - alpha_i * k_ii - s * alpha_j * k_ij;
        let f_j = y_j * (e_j + self.b) - s * alpha_i * k_ij - alpha_j * k_jj;
        let low_i = alpha_i + s * (alpha_j - low);
        let high_i = alpha_i + s * (alpha_j - high);

        let obj_low = low_i * f_i
            + low * f_j
            + 0.5 * low_i * low_i * k_ii
            + 0.5 * low * low * k_jj
            + s * low * low_i * k_ij;
        let obj_high = high_i * f_i
            + high * f_j
            + 0.5 * high_i * high_i * k_ii
            + 0.5 * high * high * k_jj
            + s * high * high_i * k_ij;

        if obj_low < obj_high - 1e-12 {
            Some(low)
        } else if obj_low > obj_high + 1e-12 {
            Some(high)
        } else {
            None
        }
    }
}
