//! Logging setup.
//!
//! Plain `tracing-subscriber` output by default. With the `observability`
//! feature, spans are also exported through OpenTelemetry's stdout exporter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use warden_error::{ConfigError, WardenResult};

/// How logs are written.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "warden=debug")
    pub log_level: String,
    /// Emit one JSON object per event
    pub json_logs: bool,
}

impl LoggingConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Set the default filter.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    fn filter(&self) -> WardenResult<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .map_err(|e| ConfigError::new(format!("Invalid log filter '{}': {}", self.log_level, e)).into())
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        if self.json_logs {
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .boxed()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
#[cfg(not(feature = "observability"))]
pub fn init_logging(config: &LoggingConfig) -> WardenResult<()> {
    tracing_subscriber::registry()
        .with(config.filter()?)
        .with(config.fmt_layer())
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {}", e)).into())
}

/// Install the global subscriber with an OpenTelemetry span layer.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
#[cfg(feature = "observability")]
pub fn init_logging(config: &LoggingConfig) -> WardenResult<()> {
    use opentelemetry::{global, trace::TracerProvider, KeyValue};
    use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
    use opentelemetry_stdout::SpanExporter;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes(vec![KeyValue::new(
            "service.version",
            config.service_version.clone(),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_resource(resource)
        .build();
    global::set_tracer_provider(provider.clone());

    let tracer = provider.tracer(config.service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(config.filter()?)
        .with(config.fmt_layer())
        .with(otel_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {}", e)).into())
}
