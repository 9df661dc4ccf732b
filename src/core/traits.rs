//! Core traits: dataset access and the common method contract

use crate::core::error::{KMethodError, Result};
use crate::core::types::{EvaluationMetrics, GramMatrix};

/// Dataset abstraction for sample and label access
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn sample(&self, i: usize) -> &[f64];

    /// Get all labels (+1/-1 for binary classification)
    fn labels(&self) -> &[f64];

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Common contract for classifiers fitted on a Gram matrix.
///
/// A method is constructed unfitted with a bound parameter set, fitted on a
/// square training Gram matrix plus binary labels, and then scores held-out
/// points through a rectangular cross-Gram block whose columns index the
/// training samples.
pub trait KernelMethod {
    /// Method family identifier
    fn name(&self) -> &'static str;

    /// Fit on an n x n training Gram matrix and n labels.
    ///
    /// Refitting replaces any previous state.
    fn fit(&mut self, gram: &GramMatrix, labels: &[f64]) -> Result<()>;

    /// Predict labels for each row of a cross-Gram block (rows = new points,
    /// columns = training points). Requires a prior fit.
    fn predict(&self, cross: &GramMatrix) -> Result<Vec<f64>>;

    /// Whether fit has completed successfully
    fn is_fitted(&self) -> bool;

    /// Tally predictions on a held-out block against true labels
    fn evaluate(&self, cross: &GramMatrix, labels: &[f64]) -> Result<EvaluationMetrics> {
        if cross.rows() != labels.len() {
            return Err(KMethodError::Dimension {
                expected: labels.len(),
                actual: cross.rows(),
            });
        }
        let predicted = self.predict(cross)?;
        Ok(EvaluationMetrics::from_predictions(&predicted, labels))
    }

    fn score_accuracy(&self, cross: &GramMatrix, labels: &[f64]) -> Result<f64> {
        Ok(self.evaluate(cross, labels)?.accuracy())
    }

    fn score_precision(&self, cross: &GramMatrix, labels: &[f64]) -> Result<f64> {
        Ok(self.evaluate(cross, labels)?.precision())
    }

    fn score_recall(&self, cross: &GramMatrix, labels: &[f64]) -> Result<f64> {
        Ok(self.evaluate(cross, labels)?.recall())
    }

    fn score_f1(&self, cross: &GramMatrix, labels: &[f64]) -> Result<f64> {
        Ok(self.evaluate(cross, labels)?.f1_score())
    }
}

/// Validate a square Gram matrix against its label vector.
///
/// Shared by every method's fit implementation.
pub(crate) fn check_fit_inputs(gram: &GramMatrix, labels: &[f64]) -> Result<()> {
    if labels.is_empty() {
        return Err(KMethodError::EmptyDataset);
    }
    if !gram.is_square() || gram.rows() != labels.len() {
        return Err(KMethodError::Dimension {
            expected: labels.len(),
            actual: gram.rows(),
        });
    }
    for &label in labels {
        if label != 1.0 && label != -1.0 {
            return Err(KMethodError::InvalidLabel(label));
        }
    }
    Ok(())
}
