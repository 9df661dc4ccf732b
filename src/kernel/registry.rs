//! Kernel registry
//!
//! Explicit mapping from kernel identifier to constructor, populated once at
//! first use. The search engine resolves kernels and their tunable parameter
//! names through this registry instead of inspecting concrete types.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use crate::core::error::{KMethodError, Result};
use crate::core::types::Parameters;
use crate::kernel::exponential::ExponentialKernel;
use crate::kernel::linear::LinearKernel;
use crate::kernel::rbf::RBFKernel;
use crate::kernel::traits::Kernel;

type KernelBuilder = fn(&BTreeMap<String, f64>) -> Result<Box<dyn Kernel>>;

struct KernelEntry {
    defaults: &'static [(&'static str, f64)],
    build: KernelBuilder,
}

fn build_linear(overrides: &BTreeMap<String, f64>) -> Result<Box<dyn Kernel>> {
    // Validates that no unknown parameter was supplied
    Parameters::with_overrides(LinearKernel::DEFAULTS, overrides)?;
    Ok(Box::new(LinearKernel::new()))
}

fn build_rbf(overrides: &BTreeMap<String, f64>) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(RBFKernel::with_overrides(overrides)?))
}

fn build_exponential(overrides: &BTreeMap<String, f64>) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(ExponentialKernel::with_overrides(overrides)?))
}

fn registry() -> &'static HashMap<&'static str, KernelEntry> {
    static REGISTRY: OnceLock<HashMap<&'static str, KernelEntry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert(
            "linear",
            KernelEntry {
                defaults: LinearKernel::DEFAULTS,
                build: build_linear,
            },
        );
        map.insert(
            "rbf",
            KernelEntry {
                defaults: RBFKernel::DEFAULTS,
                build: build_rbf,
            },
        );
        map.insert(
            "exponential",
            KernelEntry {
                defaults: ExponentialKernel::DEFAULTS,
                build: build_exponential,
            },
        );
        map
    })
}

fn lookup(name: &str) -> Result<&'static KernelEntry> {
    registry()
        .get(name)
        .ok_or_else(|| KMethodError::Configuration(format!("unknown kernel '{name}'")))
}

/// Construct a registered kernel, merging overrides over its defaults
pub fn create_kernel(name: &str, overrides: &BTreeMap<String, f64>) -> Result<Box<dyn Kernel>> {
    let entry = lookup(name)?;
    (entry.build)(overrides)
}

/// Tunable parameter names a registered kernel declares
pub fn kernel_parameter_names(name: &str) -> Result<Vec<String>> {
    let entry = lookup(name)?;
    Ok(entry.defaults.iter().map(|&(n, _)| n.to_string()).collect())
}

/// Identifiers of all registered kernels, sorted
pub fn registered_kernels() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = registry().keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contents() {
        assert_eq!(registered_kernels(), vec!["exponential", "linear", "rbf"]);
    }

    #[test]
    fn test_create_kernel_defaults() {
        let kernel = create_kernel("rbf", &BTreeMap::new()).unwrap();
        assert_eq!(kernel.name(), "rbf");
        assert_eq!(kernel.parameters().get("gamma").unwrap(), 1.0);
    }

    #[test]
    fn test_create_kernel_with_override() {
        let mut overrides = BTreeMap::new();
        overrides.insert("sigma".to_string(), 3.0);
        let kernel = create_kernel("exponential", &overrides).unwrap();
        assert_eq!(kernel.parameters().get("sigma").unwrap(), 3.0);
    }

    #[test]
    fn test_create_kernel_unknown_name() {
        let result = create_kernel("polynomial", &BTreeMap::new());
        assert!(matches!(result, Err(KMethodError::Configuration(_))));
    }

    #[test]
    fn test_create_kernel_unknown_parameter() {
        let mut overrides = BTreeMap::new();
        overrides.insert("degree".to_string(), 2.0);
        let result = create_kernel("linear", &overrides);
        assert!(matches!(result, Err(KMethodError::Configuration(_))));
    }

    #[test]
    fn test_kernel_parameter_names() {
        assert!(kernel_parameter_names("linear").unwrap().is_empty());
        assert_eq!(kernel_parameter_names("rbf").unwrap(), vec!["gamma"]);
    }

    #[test]
    fn test_default_overrides_round_trip() {
        // Explicitly passing a kernel's own defaults must produce the same
        // Gram matrix as passing no overrides at all.
        let samples = vec![vec![1.0, 0.5], vec![-0.5, 2.0], vec![0.0, -1.0]];

        let plain = create_kernel("rbf", &BTreeMap::new()).unwrap();
        let mut overrides = BTreeMap::new();
        overrides.insert("gamma".to_string(), 1.0);
        let explicit = create_kernel("rbf", &overrides).unwrap();

        assert_eq!(plain.gram(&samples), explicit.gram(&samples));
    }
}
