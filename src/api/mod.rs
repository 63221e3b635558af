//! HTTP surface consumed by the gateway.

pub mod deploy;
pub mod reader;
pub mod server;

use std::sync::Arc;

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{extract::State, Router};
use tower_http::trace::TraceLayer;

use crate::k8s::Orchestrator;
use crate::metrics::{MetricsCollector, PrometheusExporter};
use crate::Result;

pub use server::ApiServer;

pub const FUNCTIONS_PATH: &str = "/system/functions";

/// Shared state handed to every handler. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<dyn Orchestrator>,
    pub metrics: MetricsCollector,
}

impl AppState {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, metrics: MetricsCollector) -> Self {
        Self {
            orchestrator,
            metrics,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            FUNCTIONS_PATH,
            get(reader::list_functions).post(deploy::deploy_function),
        )
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let exporter = PrometheusExporter::new(state.metrics.clone());
    let body = exporter.format_current_metrics()?;

    Ok(([(header::CONTENT_TYPE, exporter.content_type())], body))
}
