//! Sampling distributions for randomized search
//!
//! Distributions are injected strategies: anything with a draw-one-value
//! operation can drive the search, so new families plug in without touching
//! the engine.

use rand::{Rng, RngCore};

/// One-value sampling contract
pub trait Distribution: Send + Sync {
    fn draw(&self, rng: &mut dyn RngCore) -> f64;
}

/// Uniform draw from [low, high)
#[derive(Debug, Clone, Copy)]
pub struct Uniform {
    low: f64,
    high: f64,
}

impl Uniform {
    /// # Panics
    /// Panics unless low < high.
    pub fn new(low: f64, high: f64) -> Self {
        assert!(low < high, "Uniform requires low < high, got [{low}, {high})");
        Self { low, high }
    }
}

impl Distribution for Uniform {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        rng.gen_range(self.low..self.high)
    }
}

/// Log-uniform draw from [low, high): uniform in log space, so each decade
/// is sampled equally often
#[derive(Debug, Clone, Copy)]
pub struct LogUniform {
    log_low: f64,
    log_high: f64,
}

impl LogUniform {
    /// # Panics
    /// Panics unless 0 < low < high.
    pub fn new(low: f64, high: f64) -> Self {
        assert!(
            low > 0.0 && low < high,
            "LogUniform requires 0 < low < high, got [{low}, {high})"
        );
        Self {
            log_low: low.ln(),
            log_high: high.ln(),
        }
    }
}

impl Distribution for LogUniform {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        rng.gen_range(self.log_low..self.log_high).exp()
    }
}

/// Uniform draw over a fixed set of values
#[derive(Debug, Clone)]
pub struct Discrete {
    choices: Vec<f64>,
}

impl Discrete {
    /// # Panics
    /// Panics if choices is empty.
    pub fn new(choices: Vec<f64>) -> Self {
        assert!(!choices.is_empty(), "Discrete requires at least one choice");
        Self { choices }
    }
}

impl Distribution for Discrete {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        self.choices[rng.gen_range(0..self.choices.len())]
    }
}
