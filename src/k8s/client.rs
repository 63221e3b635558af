use crate::k8s::Orchestrator;
use crate::{FaasError, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::api::{ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub struct K8sClient {
    client: Client,
    namespace: String,
    timeout: Duration,
}

impl K8sClient {
    /// Connects using an explicit kubeconfig when given, otherwise the in-cluster
    /// service account or `~/.kube/config`.
    pub async fn connect(
        kubeconfig: Option<&Path>,
        namespace: &str,
        timeout: Duration,
    ) -> Result<Self> {
        debug!("Initializing Kubernetes client");

        let client = match kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    FaasError::ConfigError(format!(
                        "Failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let config =
                    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                        .await
                        .map_err(|e| {
                            FaasError::ConfigError(format!(
                                "Failed to load kubeconfig {}: {}",
                                path.display(),
                                e
                            ))
                        })?;
                Client::try_from(config).map_err(|e| {
                    FaasError::KubernetesError(format!("Failed to create K8s client: {}", e))
                })?
            }
            None => Client::try_default().await.map_err(|e| {
                FaasError::KubernetesError(format!("Failed to create K8s client: {}", e))
            })?,
        };

        info!(
            "Connected to Kubernetes cluster, managing functions in namespace {}",
            namespace
        );

        Ok(Self::new(client, namespace, timeout))
    }

    pub fn new(client: Client, namespace: &str, timeout: Duration) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            timeout,
        }
    }

    pub fn deployments(&self) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    pub fn services(&self) -> Api<Service> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn bounded<T, F>(&self, call: F) -> Result<std::result::Result<T, kube::Error>>
    where
        F: Future<Output = std::result::Result<T, kube::Error>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| FaasError::Timeout(self.timeout))
    }
}

fn create_error(kind: &'static str, name: &str, namespace: &str, err: kube::Error) -> FaasError {
    match err {
        kube::Error::Api(ref response) if response.code == 409 => FaasError::AlreadyExists {
            kind,
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        other => FaasError::KubernetesError(format!(
            "Failed to create {} {}/{}: {}",
            kind, namespace, name, other
        )),
    }
}

#[async_trait]
impl Orchestrator for K8sClient {
    async fn create_workload(&self, deployment: Deployment) -> Result<Deployment> {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        let api = self.deployments();

        self.bounded(api.create(&PostParams::default(), &deployment))
            .await?
            .map_err(|e| create_error("Deployment", &name, &self.namespace, e))
    }

    async fn create_network_service(&self, service: Service) -> Result<Service> {
        let name = service.metadata.name.clone().unwrap_or_default();
        let api = self.services();

        self.bounded(api.create(&PostParams::default(), &service))
            .await?
            .map_err(|e| create_error("Service", &name, &self.namespace, e))
    }

    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<Deployment>> {
        let api = self.deployments();
        let params = ListParams::default().labels(label_selector);

        let list = self.bounded(api.list(&params)).await?.map_err(|e| {
            FaasError::KubernetesError(format!(
                "Failed to list deployments in {}: {}",
                self.namespace, e
            ))
        })?;

        Ok(list.items)
    }
}
