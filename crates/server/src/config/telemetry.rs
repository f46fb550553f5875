use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Wire protocol used to ship spans to the collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    Http,
}

impl fmt::Display for OtlpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grpc => "grpc",
            Self::Http => "http",
        })
    }
}

/// `[telemetry]` section. Spans are exported over OTLP only when `enabled`;
/// log output is always on.
///
/// ```toml
/// [telemetry]
/// enabled = true
/// endpoint = "http://otel-collector:4317"
/// sample_ratio = 0.2
/// ```
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Reported as the `service.name` resource attribute.
    pub service_name: String,
    /// Fraction of traces kept. Values outside `0.0..=1.0` are clamped.
    pub sample_ratio: f64,
    pub protocol: OtlpProtocol,
    pub timeout_seconds: u64,
    /// Extra resource attributes attached to every span.
    pub resource_attributes: BTreeMap<String, String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:4317".to_owned(),
            service_name: "scorecard".to_owned(),
            sample_ratio: 1.0,
            protocol: OtlpProtocol::Grpc,
            timeout_seconds: 10,
            resource_attributes: BTreeMap::new(),
        }
    }
}
