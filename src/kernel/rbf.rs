//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) controls the kernel width.

use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::Parameters;
use crate::kernel::traits::{squared_euclidean_distance, Kernel};

/// RBF kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// - High gamma: only close points influence each other (risk of overfitting)
/// - Low gamma: distant points retain influence (risk of underfitting)
#[derive(Debug, Clone)]
pub struct RBFKernel {
    parameters: Parameters,
    gamma: f64,
}

impl RBFKernel {
    pub const DEFAULTS: &'static [(&'static str, f64)] = &[("gamma", 1.0)];

    /// Create an RBF kernel with default gamma = 1.0
    pub fn new() -> Self {
        let parameters = Parameters::from_defaults(Self::DEFAULTS);
        let gamma = parameters.get("gamma").unwrap_or(1.0);
        Self { parameters, gamma }
    }

    /// Create an RBF kernel with overrides merged over the defaults
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self> {
        let parameters = Parameters::with_overrides(Self::DEFAULTS, overrides)?;
        let gamma = parameters.get("gamma")?;
        Ok(Self { parameters, gamma })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RBFKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for RBFKernel {
    fn name(&self) -> &'static str {
        "rbf"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        (-self.gamma * squared_euclidean_distance(a, b)).exp()
    }
}
