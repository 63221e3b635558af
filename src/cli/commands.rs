use crate::api::{ApiServer, AppState};
use crate::cli::{Cli, ServerConfig};
use crate::k8s::K8sClient;
use crate::metrics::MetricsCollector;
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub async fn handle_command(cli: &Cli) -> Result<()> {
    let config = ServerConfig::try_from(cli)?;
    serve(config).await
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!(
        "Serving functions from namespace {} (API timeout {:?})",
        config.namespace, config.request_timeout
    );

    let client = K8sClient::connect(
        config.kubeconfig.as_deref(),
        &config.namespace,
        config.request_timeout,
    )
    .await?;
    let metrics = MetricsCollector::new()?;
    let state = AppState::new(Arc::new(client), metrics);

    ApiServer::new(config.addr, state).run().await
}
