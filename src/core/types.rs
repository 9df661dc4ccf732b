//! Core type definitions: Gram matrices, parameter sets and metrics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{KMethodError, Result};

/// Dense row-major matrix of kernel similarities.
///
/// Square and symmetric when built over a single sample set; rectangular
/// (rows = evaluation points, columns = training points) when built across
/// two sets for held-out scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct GramMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl GramMatrix {
    /// Create a matrix from row-major data
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(KMethodError::Dimension {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Get the entry at (i, j)
    ///
    /// # Panics
    /// Panics if the indices are out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i * self.cols + j] = value;
    }

    /// Get row i as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row index out of bounds");
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

/// Named scalar parameter set with declared defaults.
///
/// Every kernel and method declares its parameter names up front; overrides
/// may only rebind declared names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    values: BTreeMap<String, f64>,
}

impl Parameters {
    /// Create a parameter set from declared defaults
    pub fn from_defaults(defaults: &[(&str, f64)]) -> Self {
        let values = defaults
            .iter()
            .map(|&(name, value)| (name.to_string(), value))
            .collect();
        Self { values }
    }

    /// Merge overrides into the defaults, rejecting unknown names
    pub fn with_overrides(
        defaults: &[(&str, f64)],
        overrides: &BTreeMap<String, f64>,
    ) -> Result<Self> {
        let mut params = Self::from_defaults(defaults);
        for (name, &value) in overrides {
            if !params.values.contains_key(name) {
                return Err(KMethodError::Configuration(format!(
                    "unknown parameter '{name}'"
                )));
            }
            params.values.insert(name.clone(), value);
        }
        Ok(params)
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Result<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| KMethodError::Configuration(format!("missing parameter '{name}'")))
    }

    /// Declared parameter names, in sorted order
    pub fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Underlying name -> value view
    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

/// Binary classification counts for the positive class (+1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    /// Tally predicted vs. true labels
    ///
    /// # Panics
    /// Panics if the slices differ in length.
    pub fn from_predictions(predicted: &[f64], actual: &[f64]) -> Self {
        assert_eq!(
            predicted.len(),
            actual.len(),
            "Predictions and labels must have same length"
        );

        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (&pred, &truth) in predicted.iter().zip(actual.iter()) {
            match (pred > 0.0, truth > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP); 0.0 when nothing was predicted positive
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall: TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gram_matrix_creation() {
        let gram = GramMatrix::new(2, 2, vec![1.0, 0.5, 0.5, 1.0]).unwrap();
        assert_eq!(gram.rows(), 2);
        assert_eq!(gram.cols(), 2);
        assert!(gram.is_square());
        assert_eq!(gram.get(0, 1), 0.5);
        assert_eq!(gram.row(1), &[0.5, 1.0]);
    }

    #[test]
    fn test_gram_matrix_bad_length() {
        let result = GramMatrix::new(2, 2, vec![1.0, 0.5, 0.5]);
        assert!(matches!(
            result,
            Err(KMethodError::Dimension {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_gram_matrix_rectangular() {
        let mut gram = GramMatrix::zeros(1, 3);
        gram.set(0, 2, 4.0);
        assert!(!gram.is_square());
        assert_eq!(gram.get(0, 2), 4.0);
    }

    #[test]
    fn test_parameters_defaults() {
        let params = Parameters::from_defaults(&[("C", 1.0), ("tol", 1e-4)]);
        assert_eq!(params.get("C").unwrap(), 1.0);
        assert_eq!(params.names(), vec!["C".to_string(), "tol".to_string()]);
    }

    #[test]
    fn test_parameters_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("C".to_string(), 2.0);
        let params = Parameters::with_overrides(&[("C", 1.0), ("tol", 1e-4)], &overrides).unwrap();
        assert_eq!(params.get("C").unwrap(), 2.0);
        assert_eq!(params.get("tol").unwrap(), 1e-4);
    }

    #[test]
    fn test_parameters_unknown_name() {
        let mut overrides = BTreeMap::new();
        overrides.insert("gamma".to_string(), 0.5);
        let result = Parameters::with_overrides(&[("C", 1.0)], &overrides);
        assert!(matches!(result, Err(KMethodError::Configuration(_))));
    }

    #[test]
    fn test_metrics_counts() {
        let predicted = vec![1.0, 1.0, -1.0, -1.0, 1.0];
        let actual = vec![1.0, -1.0, -1.0, 1.0, 1.0];
        let metrics = EvaluationMetrics::from_predictions(&predicted, &actual);

        assert_eq!(metrics.true_positives, 2);
        assert_eq!(metrics.true_negatives, 1);
        assert_eq!(metrics.false_positives, 1);
        assert_eq!(metrics.false_negatives, 1);
        assert_eq!(metrics.accuracy(), 0.6);
        assert_eq!(metrics.precision(), 2.0 / 3.0);
        assert_eq!(metrics.recall(), 2.0 / 3.0);
    }

    #[test]
    fn test_metrics_zero_predicted_positives() {
        let predicted = vec![-1.0, -1.0];
        let actual = vec![1.0, -1.0];
        let metrics = EvaluationMetrics::from_predictions(&predicted, &actual);

        // Zero predicted positives yields precision 0, not NaN
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.f1_score(), 0.0);
    }
}
