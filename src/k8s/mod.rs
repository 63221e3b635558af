pub mod client;
pub mod descriptors;
pub mod orchestrator;
pub mod types;

pub use client::K8sClient;
pub use descriptors::{make_deployment, make_service};
pub use orchestrator::Orchestrator;
