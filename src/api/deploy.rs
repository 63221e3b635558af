//! Deploy handler: turns a function request into a Deployment and a Service.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::function::FunctionSpec;
use crate::k8s::{make_deployment, make_service, Orchestrator};
use crate::{FaasError, Result};

/// Result of the two independent create calls behind one deploy.
#[derive(Debug)]
pub struct DeployOutcome {
    pub workload: Result<()>,
    pub service: Result<()>,
}

impl DeployOutcome {
    pub fn is_complete(&self) -> bool {
        self.workload.is_ok() && self.service.is_ok()
    }

    pub fn log(&self, name: &str) {
        log_create("deployment", name, &self.workload);
        log_create("service", name, &self.service);
    }
}

fn log_create(kind: &str, name: &str, result: &Result<()>) {
    match result {
        Ok(()) => info!("Created {} - {}", kind, name),
        Err(e @ FaasError::AlreadyExists { .. }) => warn!("{}", e),
        Err(e) => error!("Failed to create {} {}: {}", kind, name, e),
    }
}

pub fn parse_function_spec(body: &[u8]) -> Result<FunctionSpec> {
    serde_json::from_slice(body).map_err(|e| FaasError::InvalidRequest(e.to_string()))
}

/// Creates the Deployment, then the Service. A failure of one never stops the
/// other, and nothing is rolled back.
pub async fn deploy(orchestrator: &dyn Orchestrator, spec: &FunctionSpec) -> DeployOutcome {
    let workload = orchestrator
        .create_workload(make_deployment(spec))
        .await
        .map(|_| ());

    let service = orchestrator
        .create_network_service(make_service(spec))
        .await
        .map(|_| ());

    DeployOutcome { workload, service }
}

/// `POST /system/functions`
///
/// Answers 400 when the body does not parse and 200 otherwise; cluster errors
/// are only logged.
pub async fn deploy_function(State(state): State<AppState>, body: Bytes) -> Result<StatusCode> {
    let spec = match parse_function_spec(&body) {
        Ok(spec) => spec,
        Err(e) => {
            warn!("Rejected deploy request: {}", e);
            state.metrics.deploy_rejected();
            return Err(e);
        }
    };

    let outcome = deploy(state.orchestrator.as_ref(), &spec).await;
    outcome.log(&spec.name);

    if outcome.workload.is_err() {
        state.metrics.create_failed("deployment");
    }
    if outcome.service.is_err() {
        state.metrics.create_failed("service");
    }

    if outcome.is_complete() {
        state.metrics.deploy_accepted();
    } else {
        warn!("Function {} is not fully deployed", spec.name);
        state.metrics.deploy_partial();
    }

    debug!("Deploy request body: {}", String::from_utf8_lossy(&body));

    Ok(StatusCode::OK)
}
