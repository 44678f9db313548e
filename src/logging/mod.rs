// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use chrono::{FixedOffset, Utc};
use opentelemetry::{KeyValue, trace::TracerProvider};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter as OtlpLogExporter, Protocol, WithExportConfig};
use opentelemetry_semantic_conventions::attribute::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use opentelemetry_sdk::{
    Resource,
    logs::SdkLoggerProvider,
    trace::{Sampler, SdkTracerProvider},
};

use crate::config::Config;
use crate::error::ServerError;

type DynLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Renders log timestamps in SGT (GMT+8), the corpus project's home timezone.
struct SgtTime;

impl FormatTime for SgtTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        match FixedOffset::east_opt(8 * 3600) {
            Some(tz) => write!(
                w,
                "{}",
                Utc::now().with_timezone(&tz).format("%Y-%m-%d %H:%M:%S")
            ),
            None => write!(w, "{}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Process-wide logging state, held as an owned handle rather than ambient
/// globals so the supervisor can tear it down at a well-defined point.
pub trait LogFacility {
    /// Detach the active handlers and fall back to a minimal sink.
    fn reset(&mut self);
}

pub struct Logging {
    handle: reload::Handle<Vec<DynLayer>, Registry>,
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Logging {
    /// Installs the global subscriber stack. Call once, before the
    /// supervisor loop starts.
    pub fn init(debug: bool, enable_otel_logs: bool) -> Result<Self, ServerError> {
        let filter = if debug { "debug" } else { "info" };
        let filter = EnvFilter::new(format!("opentelemetry_sdk=info,{filter}"));

        let otlp_span_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_protocol(Protocol::HttpBinary)
            .with_timeout(Duration::from_secs(5))
            .build()
            .map_err(|err| ServerError::Logging(err.to_string()))?;

        let resource = Resource::builder()
            .with_attributes([
                KeyValue::new(SERVICE_NAME, "corpus-wrangler"),
                KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
            ])
            .build();

        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(otlp_span_exporter)
            // we want *everything!*
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(resource.clone())
            .build();

        let mut layers: Vec<DynLayer> = vec![
            tracing_subscriber::fmt::layer().with_timer(SgtTime).boxed(),
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer("corpus-wrangler"))
                .boxed(),
        ];

        let logger_provider = if enable_otel_logs {
            let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4318".to_string());

            let provider = SdkLoggerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(
                    OtlpLogExporter::builder()
                        .with_tonic()
                        .with_endpoint(endpoint)
                        .build()
                        .map_err(|err| ServerError::Logging(err.to_string()))?,
                )
                .build();

            layers.push(OpenTelemetryTracingBridge::new(&provider).boxed());
            Some(provider)
        } else {
            None
        };

        let (reload_layer, handle) = reload::Layer::new(layers);
        tracing_subscriber::registry()
            .with(reload_layer)
            .with(filter)
            .init();

        Ok(Self {
            handle,
            tracer_provider: Some(tracer_provider),
            logger_provider,
        })
    }
}

impl LogFacility for Logging {
    /// Swaps the rich handler stack for a bare format layer, then flushes
    /// and shuts down the OpenTelemetry providers. Any diagnostics emitted
    /// after this still reach stderr through the basic handler.
    fn reset(&mut self) {
        let minimal: Vec<DynLayer> = vec![
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed(),
        ];
        if let Err(err) = self.handle.reload(minimal) {
            eprintln!("Failed to reset logging to the basic handler: {err}");
        }

        if let Some(provider) = self.logger_provider.take() {
            if let Err(err) = provider.shutdown() {
                debug!("OpenTelemetry logger provider shutdown failed: {err}");
            }
        }
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                debug!("OpenTelemetry tracer provider shutdown failed: {err}");
            }
        }
    }
}

pub fn log_startup(config: &Config, debug: bool) {
    info!("Starting corpus-wrangler");
    if debug {
        info!("Debug mode enabled");
    }
    if let Ok(rendered) = serde_json::to_string(config) {
        info!("Resolved configuration: {rendered}");
    }
}
