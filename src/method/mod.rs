//! Gram-matrix-driven classifiers and the method-family registry

pub mod family;
pub mod knn;
pub mod ksvm;
pub mod logistic;

pub use self::family::*;
pub use self::knn::*;
pub use self::ksvm::*;
pub use self::logistic::*;
