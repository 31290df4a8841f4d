use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

/// Logging and trace export configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name reported with exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Additional resource attributes
    #[serde(default)]
    pub resource_attributes: HashMap<String, String>,
    /// `EnvFilter` directive for log output
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
    /// Trace sampling rate (0.0 to 1.0)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
    /// OTLP exporter; spans are only exported when set
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            resource_attributes: HashMap::new(),
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
            sampling_rate: default_sampling_rate(),
            exporter: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

fn default_service_name() -> String {
    "parley".to_owned()
}

fn default_log_filter() -> String {
    "info".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

/// Where finished spans are shipped
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// OTLP collector endpoint
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    /// HTTP with protobuf bodies
    HttpProto,
}
