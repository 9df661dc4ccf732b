//! Kernel logistic regression
//!
//! Fits dual coefficients by gradient descent on the l2-regularized
//! logistic loss L(α) = Σᵢ log(1 + exp(−yᵢ·fᵢ)) + (λ/2)·αᵀKα with f = Kα.

use std::collections::BTreeMap;

use log::debug;

use crate::core::error::{KMethodError, Result};
use crate::core::traits::{check_fit_inputs, KernelMethod};
use crate::core::types::{GramMatrix, Parameters};

/// Kernel logistic regression with parameters `lambda` (regularization
/// strength, default 0.1) and `n_iter` (gradient steps, default 100).
pub struct KernelLogisticRegression {
    parameters: Parameters,
    state: Option<FittedState>,
}

struct FittedState {
    alpha: Vec<f64>,
}

impl KernelLogisticRegression {
    pub const DEFAULTS: &'static [(&'static str, f64)] = &[("lambda", 0.1), ("n_iter", 100.0)];

    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_defaults(Self::DEFAULTS),
            state: None,
        }
    }

    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self> {
        Ok(Self {
            parameters: Parameters::with_overrides(Self::DEFAULTS, overrides)?,
            state: None,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Raw decision values Σⱼ αⱼ·K[row, j]
    pub fn decision_function(&self, cross: &GramMatrix) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(KMethodError::NotFitted)?;
        if cross.cols() != state.alpha.len() {
            return Err(KMethodError::Dimension {
                expected: state.alpha.len(),
                actual: cross.cols(),
            });
        }
        let values = (0..cross.rows())
            .map(|i| {
                cross
                    .row(i)
                    .iter()
                    .zip(state.alpha.iter())
                    .map(|(&k, &a)| k * a)
                    .sum()
            })
            .collect();
        Ok(values)
    }
}

impl Default for KernelLogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl KernelMethod for KernelLogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn fit(&mut self, gram: &GramMatrix, labels: &[f64]) -> Result<()> {
        check_fit_inputs(gram, labels)?;
        let lambda = self.parameters.get("lambda")?;
        let n_iter = self.parameters.get("n_iter")?;
        if !n_iter.is_finite() || n_iter < 1.0 {
            return Err(KMethodError::Configuration(format!(
                "n_iter must be a positive count, got {n_iter}"
            )));
        }
        if lambda < 0.0 {
            return Err(KMethodError::Configuration(format!(
                "lambda must be non-negative, got {lambda}"
            )));
        }

        let n = labels.len();
        let step = 1.0 / n as f64;
        let mut alpha = vec![0.0; n];

        for _ in 0..n_iter.round() as usize {
            // f = K * alpha
            let f: Vec<f64> = (0..n)
                .map(|i| {
                    gram.row(i)
                        .iter()
                        .zip(alpha.iter())
                        .map(|(&k, &a)| k * a)
                        .sum()
                })
                .collect();

            // gradient direction d_i = -y_i * sigma(-y_i f_i) + lambda * alpha_i,
            // mapped through K (symmetric) for the dual update
            let d: Vec<f64> = (0..n)
                .map(|i| -labels[i] * sigmoid(-labels[i] * f[i]) + lambda * alpha[i])
                .collect();

            for i in 0..n {
                let gradient: f64 = gram
                    .row(i)
                    .iter()
                    .zip(d.iter())
                    .map(|(&k, &dj)| k * dj)
                    .sum();
                alpha[i] -= step * gradient;
            }
        }

        debug!(
            "kernel logistic regression fit: n={}, lambda={}, {} iterations",
            n, lambda, n_iter
        );
        self.state = Some(FittedState { alpha });
        Ok(())
    }

    fn predict(&self, cross: &GramMatrix) -> Result<Vec<f64>> {
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
