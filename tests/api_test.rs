use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use faas_netes::api::{router, AppState, FUNCTIONS_PATH};
use faas_netes::function::FUNCTION_LABEL;
use faas_netes::k8s::Orchestrator;
use faas_netes::metrics::MetricsCollector;
use faas_netes::{FaasError, FunctionSummary, Result};
use http_body_util::BodyExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Default)]
struct FakeOrchestrator {
    fail_creates: bool,
    list_error: Option<String>,
    list_timeout: Option<Duration>,
    extra_workloads: Vec<Deployment>,
    deployments: Mutex<Vec<Deployment>>,
    services: Mutex<Vec<Service>>,
    calls: AtomicUsize,
}

impl FakeOrchestrator {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Orchestrator for FakeOrchestrator {
    async fn create_workload(&self, deployment: Deployment) -> Result<Deployment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates {
            return Err(FaasError::KubernetesError("deployments is forbidden".to_string()));
        }
        self.deployments.lock().unwrap().push(deployment.clone());
        Ok(deployment)
    }

    async fn create_network_service(&self, service: Service) -> Result<Service> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates {
            return Err(FaasError::KubernetesError("services is forbidden".to_string()));
        }
        self.services.lock().unwrap().push(service.clone());
        Ok(service)
    }

    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<Deployment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(timeout) = self.list_timeout {
            return Err(FaasError::Timeout(timeout));
        }
        if let Some(msg) = &self.list_error {
            return Err(FaasError::KubernetesError(msg.clone()));
        }

        let created = self.deployments.lock().unwrap().clone();
        Ok(self
            .extra_workloads
            .iter()
            .cloned()
            .chain(created)
            .filter(|d| {
                d.metadata
                    .labels
                    .as_ref()
                    .is_some_and(|l| l.contains_key(label_selector))
            })
            .collect())
    }
}

fn app(fake: Arc<FakeOrchestrator>) -> axum::Router {
    let metrics = MetricsCollector::new().unwrap();
    router(AppState::new(fake, metrics))
}

fn deploy_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(FUNCTIONS_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn list_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(FUNCTIONS_PATH)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn labelled_deployment(name: &str, replicas: Option<i32>, containers: usize) -> Deployment {
    let mut d = faas_netes::k8s::make_deployment(&faas_netes::FunctionSpec {
        name: name.to_string(),
        image: format!("{name}:latest"),
    });
    if let Some(spec) = d.spec.as_mut() {
        spec.replicas = replicas;
        if let Some(pod) = spec.template.spec.as_mut() {
            pod.containers.truncate(containers);
        }
    }
    d
}

#[tokio::test]
async fn test_deploy_creates_deployment_and_service() {
    let fake = Arc::new(FakeOrchestrator::default());

    let response = app(fake.clone())
        .oneshot(deploy_request(r#"{"name":"echo","image":"echo:latest"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fake.calls(), 2);

    let deployments = fake.deployments.lock().unwrap();
    assert_eq!(deployments.len(), 1);
    let spec = deployments[0].spec.as_ref().unwrap();
    assert_eq!(spec.replicas, Some(1));
    let pod = spec.template.spec.as_ref().unwrap();
    assert_eq!(pod.containers.len(), 1);
    assert_eq!(pod.containers[0].name, "echo");
    assert_eq!(pod.containers[0].image.as_deref(), Some("echo:latest"));
    let port = &pod.containers[0].ports.as_ref().unwrap()[0];
    assert_eq!(port.container_port, 8080);
    assert_eq!(port.protocol.as_deref(), Some("TCP"));
    let template_labels = spec
        .template
        .metadata
        .as_ref()
        .and_then(|m| m.labels.as_ref())
        .unwrap();
    assert_eq!(template_labels.get(FUNCTION_LABEL).map(String::as_str), Some("echo"));

    let services = fake.services.lock().unwrap();
    assert_eq!(services.len(), 1);
    let svc = services[0].spec.as_ref().unwrap();
    assert_eq!(
        svc.selector
            .as_ref()
            .and_then(|s| s.get(FUNCTION_LABEL))
            .map(String::as_str),
        Some("echo")
    );
    let svc_port = &svc.ports.as_ref().unwrap()[0];
    assert_eq!(svc_port.port, 8080);
    assert_eq!(svc_port.target_port, Some(IntOrString::Int(8080)));
}

#[tokio::test]
async fn test_deploy_succeeds_when_cluster_rejects_both_creates() {
    let fake = Arc::new(FakeOrchestrator {
        fail_creates: true,
        ..Default::default()
    });

    let response = app(fake.clone())
        .oneshot(deploy_request(r#"{"name":"echo","image":"echo:latest"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fake.calls(), 2);
    assert!(fake.deployments.lock().unwrap().is_empty());
    assert!(fake.services.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_creates_counted_as_partial_deploy() {
    let fake = Arc::new(FakeOrchestrator {
        fail_creates: true,
        ..Default::default()
    });
    let app = app(fake);

    let response = app
        .clone()
        .oneshot(deploy_request(r#"{"name":"echo","image":"echo:latest"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let metrics = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let text = body_string(metrics).await;
    assert!(text.contains("faas_netes_deploy_requests_total{outcome=\"partial\"} 1"));
    assert!(!text.contains("outcome=\"accepted\""));
    assert!(text.contains("faas_netes_orchestrator_create_failures_total{resource=\"deployment\"} 1"));
    assert!(text.contains("faas_netes_orchestrator_create_failures_total{resource=\"service\"} 1"));
}

#[tokio::test]
async fn test_deploy_rejects_malformed_body_without_cluster_calls() {
    for body in [r#"{"name": "echo""#, "not json", r#"{"name":"echo"}"#, ""] {
        let fake = Arc::new(FakeOrchestrator::default());

        let response = app(fake.clone()).oneshot(deploy_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(fake.calls(), 0, "body: {body:?}");
    }
}

#[tokio::test]
async fn test_deploy_accepts_body_without_content_type() {
    let fake = Arc::new(FakeOrchestrator::default());
    let request = Request::builder()
        .method("POST")
        .uri(FUNCTIONS_PATH)
        .body(Body::from(r#"{"service":"nodeinfo","image":"functions/nodeinfo"}"#))
        .unwrap();

    let response = app(fake.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fake.deployments.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_empty_cluster_returns_empty_array() {
    let fake = Arc::new(FakeOrchestrator::default());

    let response = app(fake).oneshot(list_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(body_string(response).await, "[]");
}

#[tokio::test]
async fn test_list_reports_unset_replicas_as_zero() {
    let fake = Arc::new(FakeOrchestrator {
        extra_workloads: vec![labelled_deployment("echo", None, 1)],
        ..Default::default()
    });

    let response = app(fake).oneshot(list_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let functions: Vec<FunctionSummary> =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name, "echo");
    assert_eq!(functions[0].replica_count, 0);
    assert_eq!(functions[0].image, "echo:latest");
    assert_eq!(functions[0].invocation_count, 0);
}

#[tokio::test]
async fn test_list_skips_workloads_without_containers() {
    let fake = Arc::new(FakeOrchestrator {
        extra_workloads: vec![
            labelled_deployment("zeta", Some(2), 1),
            labelled_deployment("broken", Some(1), 0),
            labelled_deployment("alpha", Some(1), 1),
        ],
        ..Default::default()
    });

    let response = app(fake).oneshot(list_request()).await.unwrap();
    let functions: Vec<FunctionSummary> =
        serde_json::from_str(&body_string(response).await).unwrap();

    let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
    assert_eq!(functions[1].replica_count, 2);
}

#[tokio::test]
async fn test_list_failure_returns_server_error_with_message() {
    let fake = Arc::new(FakeOrchestrator {
        list_error: Some("connection refused".to_string()),
        ..Default::default()
    });

    let response = app(fake).oneshot(list_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("connection refused"));
    assert!(serde_json::from_str::<Vec<FunctionSummary>>(&body).is_err());
}

#[tokio::test]
async fn test_list_timeout_returns_server_error() {
    let fake = Arc::new(FakeOrchestrator {
        list_timeout: Some(Duration::from_millis(100)),
        ..Default::default()
    });

    let response = app(fake).oneshot(list_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("timed out"));
}

#[tokio::test]
async fn test_deployed_function_shows_up_in_listing() {
    let fake = Arc::new(FakeOrchestrator::default());
    let app = app(fake.clone());

    let response = app
        .clone()
        .oneshot(deploy_request(r#"{"name":"figlet","image":"functions/figlet:0.1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(list_request()).await.unwrap();
    let functions: Vec<FunctionSummary> =
        serde_json::from_str(&body_string(response).await).unwrap();

    assert_eq!(
        functions,
        vec![FunctionSummary {
            name: "figlet".to_string(),
            replica_count: 1,
            image: "functions/figlet:0.1".to_string(),
            invocation_count: 0,
        }]
    );
}

#[tokio::test]
async fn test_metrics_and_health_endpoints() {
    let fake = Arc::new(FakeOrchestrator::default());
    let app = app(fake);

    let health = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    app.clone()
        .oneshot(deploy_request("{"))
        .await
        .unwrap();

    let metrics = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(metrics.status(), StatusCode::OK);
    let text = body_string(metrics).await;
    assert!(text.contains("faas_netes_deploy_requests_total{outcome=\"rejected\"} 1"));
}
