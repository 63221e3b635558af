use crate::metrics::collector::MetricsCollector;
use crate::Result;
use prometheus::{Encoder, TextEncoder};

pub struct PrometheusExporter {
    collector: MetricsCollector,
}

impl PrometheusExporter {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    pub fn format_current_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.collector.registry().gather();

        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| crate::FaasError::MetricsError(e.to_string()))
    }
}
