//! Rust implementation of kernel-method classifiers
//!
//! Kernels induce a Gram matrix over a training set; methods (SVM, KNN,
//! logistic regression) fit on that matrix and are tuned by cross-validated
//! randomized search.

pub mod core;
pub mod data;
pub mod kernel;
pub mod method;
pub mod model_selection;
pub mod solver;
pub mod tuning;

// Re-export main types for convenience
pub use crate::core::error::{KMethodError, Result};
pub use crate::core::traits::{Dataset, KernelMethod};
pub use crate::core::types::{EvaluationMetrics, GramMatrix, Parameters};
pub use crate::data::VectorDataset;
pub use crate::kernel::{ExponentialKernel, Kernel, LinearKernel, RBFKernel};
pub use crate::method::{KernelKNN, KernelLogisticRegression, MethodFamily, KSVM};
pub use crate::model_selection::{CrossValidation, CvReport, MetricSummary};
pub use crate::solver::{QpSolution, QpSolver, SMOSolver};
pub use crate::tuning::{
    Discrete, Distribution, LogUniform, ParameterGrid, RandomSearch, RandomSearchPerKernel,
    SearchOutcome, TrialRecord, Uniform,
};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
