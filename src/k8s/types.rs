use crate::function::FunctionSummary;
use crate::{FaasError, Result};
use k8s_openapi::api::apps::v1::Deployment;

impl FunctionSummary {
    /// Projects a function Deployment into a listing entry.
    ///
    /// Fails with `MalformedWorkload` when the pod template has no container to
    /// take the image from.
    pub fn from_k8s_deployment(deployment: &Deployment) -> Result<Self> {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        let spec = deployment.spec.as_ref();

        let replica_count = spec
            .and_then(|s| s.replicas)
            .map(|r| u64::try_from(r).unwrap_or(0))
            .unwrap_or(0);

        let container = spec
            .and_then(|s| s.template.spec.as_ref())
            .and_then(|p| p.containers.first())
            .ok_or_else(|| FaasError::MalformedWorkload {
                name: name.clone(),
                reason: "pod template has no containers".to_string(),
            })?;

        Ok(Self {
            name,
            replica_count,
            image: container.image.clone().unwrap_or_default(),
            invocation_count: 0,
        })
    }
}
