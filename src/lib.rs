pub mod api;
pub mod cli;
pub mod error;
pub mod function;
pub mod k8s;
pub mod metrics;

pub use error::{FaasError, Result};
pub use function::{FunctionSpec, FunctionSummary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
