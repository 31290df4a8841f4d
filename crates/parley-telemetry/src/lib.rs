//! Logging and trace export for parley
//!
//! Installs a `tracing-subscriber` stack: an `EnvFilter`, a text or JSON fmt
//! layer, and an OpenTelemetry layer when an OTLP exporter is configured.

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use opentelemetry_semantic_conventions::resource as semconv;
use parley_config::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Keeps the tracer provider alive and flushes it on drop
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and optional trace export
///
/// Without a config, logs are written as text filtered by `RUST_LOG` or
/// `fallback_filter`. The returned guard must be held for the lifetime of
/// the process.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, fallback_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let directive = config.map_or(fallback_filter, |c| c.log_filter.as_str());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = config.map_or(LogFormat::Text, |c| c.log_format);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![fmt_layer(format)];
    let mut guard = TelemetryGuard { tracer_provider: None };

    if let Some(telemetry) = config
        && let Some(exporter) = telemetry.exporter.as_ref()
    {
        let provider = init_tracer(telemetry, exporter)?;
        let tracer = provider.tracer("parley");
        layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
        global::set_tracer_provider(provider.clone());
        guard.tracer_provider = Some(provider);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
    }
}

fn init_tracer(config: &TelemetryConfig, exporter: &ExporterConfig) -> anyhow::Result<SdkTracerProvider> {
    use opentelemetry_otlp::{SpanExporter, WithExportConfig};

    let span_exporter = match exporter.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(exporter.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(exporter.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(SdkTracerProvider::builder()
        .with_resource(resource(config))
        .with_sampler(sampler(config.sampling_rate))
        .with_batch_exporter(span_exporter)
        .build())
}

/// Parent-based sampler honoring the configured ratio
fn sampler(rate: f64) -> Sampler {
    let root = if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    };

    Sampler::ParentBased(Box::new(root))
}

/// Service identity plus any configured extra attributes
fn resource(config: &TelemetryConfig) -> Resource {
    let extra = config
        .resource_attributes
        .iter()
        .map(|(key, value)| KeyValue::new(key.clone(), value.clone()));

    Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attribute(KeyValue::new(semconv::SERVICE_VERSION, env!("CARGO_PKG_VERSION")))
        .with_attributes(extra)
        .build()
}
