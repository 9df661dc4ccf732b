//! In-memory dataset container
//!
//! Raw data loading lives outside the core; anything that can produce dense
//! feature rows plus binary labels can be wrapped in a [`VectorDataset`].

use rand::seq::SliceRandom;
use rand::rngs::StdRng;

use crate::core::error::{KMethodError, Result};
use crate::core::traits::Dataset;

/// Dense feature rows with binary labels
#[derive(Debug, Clone)]
pub struct VectorDataset {
    samples: Vec<Vec<f64>>,
    labels: Vec<f64>,
}

impl VectorDataset {
    /// Create a dataset, validating shapes and labels
    pub fn new(samples: Vec<Vec<f64>>, labels: Vec<f64>) -> Result<Self> {
        if samples.is_empty() {
            return Err(KMethodError::EmptyDataset);
        }
        if samples.len() != labels.len() {
            return Err(KMethodError::Dimension {
                expected: samples.len(),
                actual: labels.len(),
            });
        }
        let dim = samples[0].len();
        for row in &samples {
            if row.len() != dim {
                return Err(KMethodError::Dimension {
                    expected: dim,
                    actual: row.len(),
                });
            }
        }
        for &label in &labels {
            if label != 1.0 && label != -1.0 {
                return Err(KMethodError::InvalidLabel(label));
            }
        }
        Ok(Self { samples, labels })
    }

    /// All sample rows
    pub fn samples(&self) -> &[Vec<f64>] {
        &self.samples
    }

    /// Extract owned (samples, labels) for an index subset
    pub fn subset(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
        let samples = indices.iter().map(|&i| self.samples[i].clone()).collect();
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        (samples, labels)
    }

    /// Partition indices into disjoint (train, validation) sets.
    ///
    /// The validation set holds `ceil(n * validation_fraction)` shuffled
    /// indices, clamped so both sides stay non-empty.
    pub fn split(&self, validation_fraction: f64, rng: &mut StdRng) -> Result<(Vec<usize>, Vec<usize>)> {
        if !(0.0..1.0).contains(&validation_fraction) || validation_fraction == 0.0 {
            return Err(KMethodError::Configuration(format!(
                "validation fraction must be in (0, 1), got {validation_fraction}"
            )));
        }
        let n = self.len();
        if n < 2 {
            return Err(KMethodError::Configuration(
                "cannot split fewer than 2 samples".to_string(),
            ));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);

        let n_val = ((n as f64 * validation_fraction).ceil() as usize).clamp(1, n - 1);
        let validation = indices[..n_val].to_vec();
        let train = indices[n_val..].to_vec();
        Ok((train, validation))
    }
}

impl Dataset for VectorDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.samples[0].len()
    }

    fn sample(&self, i: usize) -> &[f64] {
        &self.samples[i]
    }

    fn labels(&self) -> &[f64] {
        &self.labels
    }
}
