use crate::Result;
use prometheus::{IntCounterVec, IntGauge, Opts, Registry};

/// Counters for the provider's own activity. Clones share the same registry.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Registry,
    deploy_requests: IntCounterVec,
    create_failures: IntCounterVec,
    list_requests: IntCounterVec,
    functions_listed: IntGauge,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new_custom(Some("faas_netes".to_string()), None)?;

        let deploy_requests = IntCounterVec::new(
            Opts::new("deploy_requests_total", "Deploy requests by outcome"),
            &["outcome"],
        )?;
        let create_failures = IntCounterVec::new(
            Opts::new(
                "orchestrator_create_failures_total",
                "Failed create calls against the cluster by resource kind",
            ),
            &["resource"],
        )?;
        let list_requests = IntCounterVec::new(
            Opts::new("list_requests_total", "List requests by outcome"),
            &["outcome"],
        )?;
        let functions_listed = IntGauge::new(
            "functions_listed",
            "Number of functions returned by the last successful listing",
        )?;

        registry.register(Box::new(deploy_requests.clone()))?;
        registry.register(Box::new(create_failures.clone()))?;
        registry.register(Box::new(list_requests.clone()))?;
        registry.register(Box::new(functions_listed.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            deploy_requests,
            create_failures,
            list_requests,
            functions_listed,
        })
    }

    pub fn deploy_accepted(&self) {
        self.deploy_requests.with_label_values(&["accepted"]).inc();
    }

    pub fn deploy_partial(&self) {
        self.deploy_requests.with_label_values(&["partial"]).inc();
    }

    pub fn deploy_rejected(&self) {
        self.deploy_requests.with_label_values(&["rejected"]).inc();
    }

    pub fn create_failed(&self, resource: &str) {
        self.create_failures.with_label_values(&[resource]).inc();
    }

    pub fn list_succeeded(&self, count: usize) {
        self.list_requests.with_label_values(&["success"]).inc();
        self.functions_listed
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    pub fn list_failed(&self) {
        self.list_requests.with_label_values(&["error"]).inc();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
