//! Kernel functions and the kernel registry

pub mod exponential;
pub mod linear;
pub mod rbf;
pub mod registry;
pub mod traits;

pub use self::exponential::*;
pub use self::linear::*;
pub use self::rbf::*;
pub use self::registry::*;
pub use self::traits::*;
