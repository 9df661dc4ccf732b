//! Method-family registry
//!
//! Maps a method identifier to its constructor and its tunable parameter
//! names. The search engine resolves both here once at construction instead
//! of inspecting concrete method types at runtime.

use std::collections::BTreeMap;

use crate::core::error::{KMethodError, Result};
use crate::core::traits::KernelMethod;
use crate::core::types::Parameters;
use crate::method::knn::KernelKNN;
use crate::method::ksvm::KSVM;
use crate::method::logistic::KernelLogisticRegression;

/// Recognized classifier families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodFamily {
    Svm,
    Knn,
    LogisticRegression,
}

impl MethodFamily {
    /// All recognized families
    pub const ALL: &'static [MethodFamily] = &[
        MethodFamily::Svm,
        MethodFamily::Knn,
        MethodFamily::LogisticRegression,
    ];

    /// Resolve a family from its identifier
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ksvm" => Ok(MethodFamily::Svm),
            "knn" => Ok(MethodFamily::Knn),
            "logistic_regression" => Ok(MethodFamily::LogisticRegression),
            other => Err(KMethodError::UnsupportedMethod(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MethodFamily::Svm => "ksvm",
            MethodFamily::Knn => "knn",
            MethodFamily::LogisticRegression => "logistic_regression",
        }
    }

    /// Parameter names the search engine may tune for this family
    pub fn tunable_parameters(&self) -> &'static [&'static str] {
        match self {
            MethodFamily::Svm => &["C"],
            MethodFamily::Knn => &["n_neighbors"],
            MethodFamily::LogisticRegression => &["lambda", "n_iter"],
        }
    }

    /// Declared defaults for this family
    pub fn default_parameters(&self) -> Parameters {
        match self {
            MethodFamily::Svm => Parameters::from_defaults(KSVM::DEFAULTS),
            MethodFamily::Knn => Parameters::from_defaults(KernelKNN::DEFAULTS),
            MethodFamily::LogisticRegression => {
                Parameters::from_defaults(KernelLogisticRegression::DEFAULTS)
            }
        }
    }

    /// Construct an unfitted method with overrides merged over the defaults
    pub fn build(&self, overrides: &BTreeMap<String, f64>) -> Result<Box<dyn KernelMethod>> {
        match self {
            MethodFamily::Svm => Ok(Box::new(KSVM::with_overrides(overrides)?)),
            MethodFamily::Knn => Ok(Box::new(KernelKNN::with_overrides(overrides)?)),
            MethodFamily::LogisticRegression => Ok(Box::new(
                KernelLogisticRegression::with_overrides(overrides)?,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_name() {
        assert_eq!(MethodFamily::from_name("ksvm").unwrap(), MethodFamily::Svm);
        assert_eq!(MethodFamily::from_name("knn").unwrap(), MethodFamily::Knn);
        assert_eq!(
            MethodFamily::from_name("logistic_regression").unwrap(),
            MethodFamily::LogisticRegression
        );
    }

    #[test]
    fn test_family_unknown_name() {
        assert!(matches!(
            MethodFamily::from_name("random_forest"),
            Err(KMethodError::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn test_tunable_parameters_per_family() {
        assert_eq!(MethodFamily::Svm.tunable_parameters(), &["C"]);
        assert_eq!(MethodFamily::Knn.tunable_parameters(), &["n_neighbors"]);
        assert_eq!(
            MethodFamily::LogisticRegression.tunable_parameters(),
            &["lambda", "n_iter"]
        );
    }

    #[test]
    fn test_tunable_parameters_are_declared() {
        // Every tunable name must exist in the family's declared defaults
        for family in MethodFamily::ALL {
            let defaults = family.default_parameters();
            for name in family.tunable_parameters() {
                assert!(defaults.get(name).is_ok(), "{name} not declared");
            }
        }
    }

    #[test]
    fn test_build_with_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("C".to_string(), 4.0);
        let method = MethodFamily::Svm.build(&overrides).unwrap();
        assert_eq!(method.name(), "ksvm");
        assert!(!method.is_fitted());
    }

    #[test]
    fn test_build_rejects_foreign_parameter() {
        let mut overrides = BTreeMap::new();
        overrides.insert("C".to_string(), 1.0);
        assert!(MethodFamily::Knn.build(&overrides).is_err());
    }
}
