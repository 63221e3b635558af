use crate::Result;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;

/// The slice of the cluster API the handlers need.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn create_workload(&self, deployment: Deployment) -> Result<Deployment>;

    async fn create_network_service(&self, service: Service) -> Result<Service>;

    /// Lists Deployments carrying the given label selector, in API order.
    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<Deployment>>;
}
