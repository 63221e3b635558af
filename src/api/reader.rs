//! Inventory reader: lists function Deployments as `FunctionSummary` entries.

use axum::extract::State;
use axum::Json;
use tracing::{error, warn};

use super::AppState;
use crate::function::{FunctionSummary, FUNCTION_LABEL};
use crate::k8s::Orchestrator;
use crate::Result;

/// Lists every Deployment carrying the function label.
///
/// Deployments that cannot be summarized are skipped with a warning. The
/// result is sorted by name.
pub async fn read_functions(orchestrator: &dyn Orchestrator) -> Result<Vec<FunctionSummary>> {
    let deployments = orchestrator.list_workloads(FUNCTION_LABEL).await?;

    let mut functions: Vec<FunctionSummary> = deployments
        .iter()
        .filter_map(|d| match FunctionSummary::from_k8s_deployment(d) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Skipping deployment: {}", e);
                None
            }
        })
        .collect();

    functions.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(functions)
}

/// `GET /system/functions`
pub async fn list_functions(State(state): State<AppState>) -> Result<Json<Vec<FunctionSummary>>> {
    match read_functions(state.orchestrator.as_ref()).await {
        Ok(functions) => {
            state.metrics.list_succeeded(functions.len());
            Ok(Json(functions))
        }
        Err(e) => {
            error!("Failed to list functions: {}", e);
            state.metrics.list_failed();
            Err(e)
        }
    }
}
