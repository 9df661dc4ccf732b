//! Cross-validated scoring
//!
//! Repeatedly splits a dataset, refits a method per split and aggregates
//! mean/standard-deviation of each scoring metric across folds.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::core::error::{KMethodError, Result};
use crate::core::traits::KernelMethod;
use crate::data::VectorDataset;
use crate::kernel::Kernel;

/// Mean and population standard deviation of one metric across folds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std: f64,
}

impl MetricSummary {
    /// Aggregate fold scores; std uses ddof = 0 for determinism
    fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self { mean: 0.0, std: 0.0 };
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let variance =
            scores.iter().map(|&s| (s - mean) * (s - mean)).sum::<f64>() / scores.len() as f64;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }
}

/// Per-metric summaries for one cross-validated method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvReport {
    pub accuracy: MetricSummary,
    pub precision: MetricSummary,
    pub recall: MetricSummary,
    pub f1: MetricSummary,
}

impl CvReport {
    /// Metric names recognized by [`CvReport::metric`]
    pub const METRICS: &'static [&'static str] = &["accuracy", "precision", "recall", "f1"];

    /// Look up a summary by metric name
    pub fn metric(&self, name: &str) -> Result<MetricSummary> {
        match name {
            "accuracy" => Ok(self.accuracy),
            "precision" => Ok(self.precision),
            "recall" => Ok(self.recall),
            "f1" => Ok(self.f1),
            other => Err(KMethodError::Configuration(format!(
                "unknown metric '{other}'"
            ))),
        }
    }
}

/// Repeated random-split cross-validation
#[derive(Debug, Clone)]
pub struct CrossValidation {
    folds: usize,
    validation_fraction: f64,
    seed: Option<u64>,
}

impl Default for CrossValidation {
    fn default() -> Self {
        Self {
            folds: 5,
            validation_fraction: 0.2,
            seed: None,
        }
    }
}

impl CrossValidation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of random splits
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Set the held-out fraction per split
    pub fn with_validation_fraction(mut self, fraction: f64) -> Self {
        self.validation_fraction = fraction;
        self
    }

    /// Fix the split sequence; identical inputs then reproduce identical folds
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit and score `method` across folds drawn from `dataset`.
    ///
    /// Per fold: fit on the train block's Gram matrix, score on the
    /// validation-by-train cross block. Fit idempotence lets one method
    /// instance be refitted per fold.
    pub fn run(
        &self,
        dataset: &VectorDataset,
        kernel: &dyn Kernel,
        method: &mut dyn KernelMethod,
    ) -> Result<CvReport> {
        if self.folds == 0 {
            return Err(KMethodError::Configuration(
                "fold count must be positive".to_string(),
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut accuracy = Vec::with_capacity(self.folds);
        let mut precision = Vec::with_capacity(self.folds);
        let mut recall = Vec::with_capacity(self.folds);
        let mut f1 = Vec::with_capacity(self.folds);

        for fold in 0..self.folds {
            let (train_idx, val_idx) = dataset.split(self.validation_fraction, &mut rng)?;
            let (train_samples, train_labels) = dataset.subset(&train_idx);
            let (val_samples, val_labels) = dataset.subset(&val_idx);

            let train_gram = kernel.gram(&train_samples);
            method.fit(&train_gram, &train_labels)?;

            let cross = kernel.cross_gram(&val_samples, &train_samples);
            let metrics = method.evaluate(&cross, &val_labels)?;

            debug!(
                "fold {}/{}: {} train, {} validation, accuracy {:.4}",
                fold + 1,
                self.folds,
                train_idx.len(),
                val_idx.len(),
                metrics.accuracy()
            );

            accuracy.push(metrics.accuracy());
            precision.push(metrics.precision());
            recall.push(metrics.recall());
            f1.push(metrics.f1_score());
        }

        Ok(CvReport {
            accuracy: MetricSummary::from_scores(&accuracy),
            precision: MetricSummary::from_scores(&precision),
            recall: MetricSummary::from_scores(&recall),
            f1: MetricSummary::from_scores(&f1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::kernel::LinearKernel;
    use crate::method::KSVM;

    fn separable_dataset() -> VectorDataset {
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        for i in 0..5 {
            samples.push(vec![1.0 + 0.2 * i as f64, 1.0]);
            labels.push(1.0);
            samples.push(vec![-1.0 - 0.2 * i as f64, -1.0]);
            labels.push(-1.0);
        }
        VectorDataset::new(samples, labels).unwrap()
    }

    #[test]
    fn test_cv_separable_dataset_perfect_score() {
        let dataset = separable_dataset();
        let mut svm = KSVM::new();
        let cv = CrossValidation::new().with_folds(4).with_seed(11);

        let report = cv.run(&dataset, &LinearKernel::new(), &mut svm).unwrap();
        assert_relative_eq!(report.accuracy.mean, 1.0);
        assert_relative_eq!(report.accuracy.std, 0.0);
    }

    #[test]
    fn test_cv_reproducible_with_seed() {
        let dataset = separable_dataset();
        let cv = CrossValidation::new().with_folds(3).with_seed(99);

        let first = cv.run(&dataset, &LinearKernel::new(), &mut KSVM::new()).unwrap();
        let second = cv.run(&dataset, &LinearKernel::new(), &mut KSVM::new()).unwrap();
        assert_eq!(first.accuracy, second.accuracy);
        assert_eq!(first.f1, second.f1);
    }

    #[test]
    fn test_cv_zero_folds_rejected() {
        let dataset = separable_dataset();
        let cv = CrossValidation::new().with_folds(0);
        let result = cv.run(&dataset, &LinearKernel::new(), &mut KSVM::new());
        assert!(matches!(result, Err(KMethodError::Configuration(_))));
    }

    #[test]
    fn test_metric_summary_population_std() {
        let summary = MetricSummary::from_scores(&[0.5, 1.0]);
        assert_relative_eq!(summary.mean, 0.75);
        // Population std (ddof = 0): sqrt(((0.25)^2 + (0.25)^2) / 2) = 0.25
        assert_relative_eq!(summary.std, 0.25);
    }

    #[test]
    fn test_report_metric_lookup() {
        let summary = MetricSummary { mean: 0.9, std: 0.1 };
        let report = CvReport {
            accuracy: summary,
            precision: summary,
            recall: summary,
            f1: summary,
        };
        assert_eq!(report.metric("accuracy").unwrap().mean, 0.9);
        assert!(report.metric("auc").is_err());
    }
}
