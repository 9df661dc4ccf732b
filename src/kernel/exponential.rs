//! Exponential kernel implementation
//!
//! K(x, y) = exp(-||x - y|| / (2σ²)), a Laplacian-style kernel on the plain
//! (not squared) Euclidean distance.

use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::Parameters;
use crate::kernel::traits::{squared_euclidean_distance, Kernel};

/// Exponential kernel: K(x, y) = exp(-||x - y|| / (2σ²))
#[derive(Debug, Clone)]
pub struct ExponentialKernel {
    parameters: Parameters,
    sigma: f64,
}

impl ExponentialKernel {
    pub const DEFAULTS: &'static [(&'static str, f64)] = &[("sigma", 1.0)];

    /// Create an exponential kernel with default sigma = 1.0
    pub fn new() -> Self {
        let parameters = Parameters::from_defaults(Self::DEFAULTS);
        let sigma = parameters.get("sigma").unwrap_or(1.0);
        Self { parameters, sigma }
    }

    /// Create an exponential kernel with overrides merged over the defaults
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self> {
        let parameters = Parameters::with_overrides(Self::DEFAULTS, overrides)?;
        let sigma = parameters.get("sigma")?;
        Ok(Self { parameters, sigma })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for ExponentialKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for ExponentialKernel {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        let distance = squared_euclidean_distance(a, b).sqrt();
        (-distance / (2.0 * self.sigma * self.sigma)).exp()
    }
}
