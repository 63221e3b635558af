use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaasError {
    #[error("Kubernetes error: {0}")]
    KubernetesError(String),

    #[error("{kind} {name} already exists in namespace {namespace}")]
    AlreadyExists {
        kind: &'static str,
        name: String,
        namespace: String,
    },

    #[error("Kubernetes request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Malformed workload {name}: {reason}")]
    MalformedWorkload { name: String, reason: String },

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FaasError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FaasError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<prometheus::Error> for FaasError {
    fn from(e: prometheus::Error) -> Self {
        FaasError::MetricsError(e.to_string())
    }
}

impl IntoResponse for FaasError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, FaasError>;
