//! Kernel k-nearest-neighbor classifier
//!
//! Neighborhood is defined directly by kernel similarity: the k training
//! points most similar to a query vote with their labels.

use std::collections::BTreeMap;

use crate::core::error::{KMethodError, Result};
use crate::core::traits::{check_fit_inputs, KernelMethod};
use crate::core::types::{GramMatrix, Parameters};

/// Kernel KNN with parameter `n_neighbors` (default 5)
pub struct KernelKNN {
    parameters: Parameters,
    state: Option<FittedState>,
}

struct FittedState {
    labels: Vec<f64>,
}

impl KernelKNN {
    pub const DEFAULTS: &'static [(&'static str, f64)] = &[("n_neighbors", 5.0)];

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

    fn neighbor_count(&self, n_train: usize) -> Result<usize> {
        let raw = self.parameters.get("n_neighbors")?;
        if !raw.is_finite() || raw < 1.0 {
            return Err(KMethodError::Configuration(format!(
                "n_neighbors must be a positive count, got {raw}"
            )));
        }
        Ok((raw.round() as usize).min(n_train))
    }
}

impl Default for KernelKNN {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelMethod for KernelKNN {
    fn name(&self) -> &'static str {
        "knn"
    }

    fn fit(&mut self, gram: &GramMatrix, labels: &[f64]) -> Result<()> {
        check_fit_inputs(gram, labels)?;
        // Validate the neighbor count eagerly so a bad parameter fails at
        // fit time, like the other methods.
        self.neighbor_count(labels.len())?;
        self.state = Some(FittedState {
            labels: labels.to_vec(),
        });
        Ok(())
    }

    fn predict(&self, cross: &GramMatrix) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(KMethodError::NotFitted)?;
        let n_train = state.labels.len();
        if cross.cols() != n_train {
            return Err(KMethodError::Dimension {
                expected: n_train,
                actual: cross.cols(),
            });
        }
        let k = self.neighbor_count(n_train)?;

        let mut predictions = Vec::with_capacity(cross.rows());
        for i in 0..cross.rows() {
            let row = cross.row(i);
            let mut order: Vec<usize> = (0..n_train).collect();
            order.sort_by(|&a, &b| {
                row[b]
                    .partial_cmp(&row[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let vote: f64 = order[..k].iter().map(|&j| state.labels[j]).sum();
            // Ties go to the positive class
            predictions.push(if vote >= 0.0 { 1.0 } else { -1.0 });
        }
        Ok(predictions)
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}
