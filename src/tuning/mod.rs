//! Randomized hyperparameter search
//!
//! Draws random kernel and method parameters from configured distributions,
//! cross-validates each sample, and selects the best (kernel, parameter-set)
//! pair across candidate kernel families.

pub mod distribution;

pub use self::distribution::*;

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::core::error::{KMethodError, Result};
use crate::data::VectorDataset;
use crate::kernel::registry::{create_kernel, kernel_parameter_names};
use crate::method::MethodFamily;
use crate::model_selection::{CrossValidation, CvReport};

/// Tunable parameter distributions plus the candidate kernel identifiers
pub struct ParameterGrid {
    kernels: Vec<String>,
    distributions: HashMap<String, Box<dyn Distribution>>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self {
            kernels: Vec::new(),
            distributions: HashMap::new(),
        }
    }

    /// Add a candidate kernel identifier (enumeration order is selection
    /// tie-break order)
    pub fn with_kernel(mut self, name: &str) -> Self {
        self.kernels.push(name.to_string());
        self
    }

    /// Bind a sampling distribution to a parameter name
    pub fn with_parameter(mut self, name: &str, dist: Box<dyn Distribution>) -> Self {
        self.distributions.insert(name.to_string(), dist);
        self
    }

    pub fn kernels(&self) -> &[String] {
        &self.kernels
    }

    fn distribution(&self, name: &str) -> Result<&dyn Distribution> {
        self.distributions
            .get(name)
            .map(|d| d.as_ref())
            .ok_or_else(|| {
                KMethodError::Configuration(format!("no distribution for parameter '{name}'"))
            })
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// One sampled configuration and its cross-validated scores.
///
/// `report` is `None` when the trial's fit failed with an optimization
/// error; such trials are excluded from best-selection.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub parameters: BTreeMap<String, f64>,
    pub report: Option<CvReport>,
}

/// Randomized search over one kernel family
pub struct RandomSearchPerKernel<'a> {
    family: MethodFamily,
    kernel_name: &'a str,
    grid: &'a ParameterGrid,
    dataset: &'a VectorDataset,
    n_trials: usize,
    cv: CrossValidation,
}

impl<'a> RandomSearchPerKernel<'a> {
    /// Create a per-kernel search.
    ///
    /// Fails with `UnsupportedMethod` for an unrecognized method identifier
    /// and with `Configuration` for an unregistered kernel.
    pub fn new(
        method: &str,
        kernel_name: &'a str,
        grid: &'a ParameterGrid,
        dataset: &'a VectorDataset,
        n_trials: usize,
    ) -> Result<Self> {
        let family = MethodFamily::from_name(method)?;
        kernel_parameter_names(kernel_name)?;
        Ok(Self {
            family,
            kernel_name,
            grid,
            dataset,
            n_trials,
            // Folds fixed per trial so a trial's outcome depends only on its
            // drawn parameters
            cv: CrossValidation::new().with_seed(0),
        })
    }

    /// Replace the cross-validation configuration
    pub fn with_cross_validation(mut self, cv: CrossValidation) -> Self {
        self.cv = cv;
        self
    }

    /// Run all trials, drawing parameters from the shared `rng` sequence.
    ///
    /// Trials are independent: an `Optimization` failure is recorded and
    /// skipped, any other error aborts the search.
    pub fn run(&self, rng: &mut StdRng) -> Result<Vec<TrialRecord>> {
        let kernel_params = kernel_parameter_names(self.kernel_name)?;
        let method_params = self.family.tunable_parameters();

        let mut records = Vec::with_capacity(self.n_trials);
        for trial in 0..self.n_trials {
            let mut kernel_overrides = BTreeMap::new();
            for name in &kernel_params {
                kernel_overrides.insert(name.clone(), self.grid.distribution(name)?.draw(&mut *rng));
            }
            let mut method_overrides = BTreeMap::new();
            for name in method_params {
                method_overrides
                    .insert((*name).to_string(), self.grid.distribution(name)?.draw(&mut *rng));
            }

            let kernel = create_kernel(self.kernel_name, &kernel_overrides)?;
            let mut method = self.family.build(&method_overrides)?;

            let mut parameters = kernel_overrides;
            parameters.extend(method_overrides);

            let report = match self.cv.run(self.dataset, kernel.as_ref(), method.as_mut()) {
                Ok(report) => {
                    debug!(
                        "trial {}/{} on kernel '{}': accuracy {:.4}",
                        trial + 1,
                        self.n_trials,
                        self.kernel_name,
                        report.accuracy.mean
                    );
                    Some(report)
                }
                Err(KMethodError::Optimization(reason)) => {
                    warn!(
                        "trial {}/{} on kernel '{}' failed: {}",
                        trial + 1,
                        self.n_trials,
                        self.kernel_name,
                        reason
                    );
                    None
                }
                Err(other) => return Err(other),
            };

            records.push(TrialRecord { parameters, report });
        }
        Ok(records)
    }
}

/// Winning (kernel, parameter-set) pair of a full search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub kernel: String,
    pub parameters: BTreeMap<String, f64>,
    pub score: f64,
}

/// Randomized search across all candidate kernels
pub struct RandomSearch<'a> {
    method: &'a str,
    grid: &'a ParameterGrid,
    dataset: &'a VectorDataset,
    n_trials: usize,
    criterion: String,
    cv: CrossValidation,
    seed: Option<u64>,
}

impl<'a> RandomSearch<'a> {
    pub fn new(
        method: &'a str,
        grid: &'a ParameterGrid,
        dataset: &'a VectorDataset,
        n_trials: usize,
    ) -> Result<Self> {
        // Validate the family up front; per-kernel searches re-resolve it
        MethodFamily::from_name(method)?;
        Ok(Self {
            method,
            grid,
            dataset,
            n_trials,
            criterion: "accuracy".to_string(),
            cv: CrossValidation::new().with_seed(0),
            seed: None,
        })
    }

    /// Set the selection metric (one of accuracy, precision, recall, f1)
    pub fn with_criterion(mut self, criterion: &str) -> Self {
        self.criterion = criterion.to_string();
        self
    }

    /// Replace the cross-validation configuration used by every trial
    pub fn with_cross_validation(mut self, cv: CrossValidation) -> Self {
        self.cv = cv;
        self
    }

    /// Fix the parameter draw sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the search and return the best (kernel, parameter-set) pair by
    /// the criterion's mean value.
    ///
    /// Ties are broken by first-encountered kernel in enumeration order.
    /// Raw best scores are compared across kernels without any
    /// multiple-comparison correction, matching the reference behavior.
    pub fn run(&self) -> Result<SearchOutcome> {
        if !CvReport::METRICS.contains(&self.criterion.as_str()) {
            return Err(KMethodError::Configuration(format!(
                "unknown selection criterion '{}'",
                self.criterion
            )));
        }
        if self.grid.kernels().is_empty() {
            return Err(KMethodError::Configuration(
                "parameter grid declares no candidate kernels".to_string(),
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut best: Option<SearchOutcome> = None;
        for kernel_name in self.grid.kernels() {
            let search = RandomSearchPerKernel::new(
                self.method,
                kernel_name,
                self.grid,
                self.dataset,
                self.n_trials,
            )?
            .with_cross_validation(self.cv.clone());

            let records = search.run(&mut rng)?;
            for record in records {
                let Some(report) = record.report else {
                    continue;
                };
                let score = report.metric(&self.criterion)?.mean;
                // Strictly-greater keeps the first-encountered winner on ties
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(SearchOutcome {
                        kernel: kernel_name.clone(),
                        parameters: record.parameters,
                        score,
                    });
                }
            }
        }

        best.ok_or_else(|| {
            KMethodError::Optimization("every search trial failed to fit".to_string())
        })
    }
}
