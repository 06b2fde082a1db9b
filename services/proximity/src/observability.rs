//! Logging, tracing, and metrics wiring for the proximity service.
//!
//! # Purpose
//! Installs a `tracing` subscriber (env-filtered fmt output plus an optional
//! OTLP exporter), the W3C trace-context propagator, and the Prometheus
//! recorder whose snapshot is served on the metrics listener.
//!
//! # Notes
//! Initialization is guarded by `OnceLock` so tests can call it repeatedly.
use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static TRACER_PROVIDER: OnceLock<Option<SdkTracerProvider>> = OnceLock::new();
static PROPAGATOR_INIT: OnceLock<()> = OnceLock::new();

pub fn init_observability(service_name: &str) -> anyhow::Result<PrometheusHandle> {
    TRACER_PROVIDER.get_or_init(|| {
        install_propagator();

        let provider = build_tracer_provider(service_name);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer();
        let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);
        if let Some(provider) = &provider {
            let tracer = provider.tracer(service_name.to_string());
            let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
            let _ = registry.with(otel_layer).try_init();
        } else {
            let _ = registry.try_init();
        }
        provider
    });

    install_metrics_recorder()
}

/// Flush buffered spans before exit.
pub fn shutdown_tracing() {
    if let Some(Some(provider)) = TRACER_PROVIDER.get() {
        if let Err(err) = provider.shutdown() {
            tracing::warn!(error = %err, "tracer provider shutdown failed");
        }
    }
}

fn install_propagator() {
    PROPAGATOR_INIT.get_or_init(|| {
        global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );
    });
}

fn build_tracer_provider(service_name: &str) -> Option<SdkTracerProvider> {
    // Without a collector endpoint there is nothing to export to.
    std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;
    let resource = Resource::builder_empty()
        .with_attributes(resource_attributes(service_name))
        .build();
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .ok()?;
    Some(
        SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build(),
    )
}

fn resource_attributes(service_name: &str) -> Vec<KeyValue> {
    let mut attrs = vec![
        KeyValue::new("service.name", service_name.to_string()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ];
    if let Ok(value) =
        std::env::var("PROXIMITY_SERVICE_INSTANCE_ID").or_else(|_| std::env::var("HOSTNAME"))
    {
        attrs.push(KeyValue::new("service.instance.id", value));
    }
    if let Ok(value) = std::env::var("DEPLOYMENT_ENVIRONMENT") {
        attrs.push(KeyValue::new("deployment.environment", value));
    }
    attrs
}

pub fn trace_context_from_headers(headers: &axum::http::HeaderMap) -> opentelemetry::Context {
    install_propagator();
    global::get_text_map_propagator(|prop| prop.extract(&HeaderMapExtractor(headers)))
}

struct HeaderMapExtractor<'a>(&'a axum::http::HeaderMap);

impl Extractor for HeaderMapExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

pub async fn serve_metrics<F>(
    handle: PrometheusHandle,
    addr: SocketAddr,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_metrics_with_listener(handle, listener, shutdown).await
}

async fn serve_metrics_with_listener<F>(
    handle: PrometheusHandle,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("install metrics recorder")?;
    let _ = METRICS_HANDLE.set(handle.clone());
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    metrics::describe_counter!(
        "proximity_submissions_total",
        "Submissions handled, labelled by outcome."
    );
    metrics::describe_counter!(
        "proximity_results_requests_total",
        "Aggregate result requests, labelled by outcome."
    );
    metrics::describe_gauge!(
        "proximity_selections_total",
        "Stored selections as last observed by this process."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{TraceContextExt, TraceId};
    use serial_test::serial;
    use std::time::{Duration, Instant};
    use tokio::sync::oneshot;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    fn attribute_map(attrs: Vec<KeyValue>) -> std::collections::HashMap<String, String> {
        attrs
            .into_iter()
            .map(|attr| (attr.key.as_str().to_string(), attr.value.to_string()))
            .collect()
    }

    #[test]
    #[serial]
    fn resource_attributes_capture_env() {
        let _g1 = EnvGuard::set("PROXIMITY_SERVICE_INSTANCE_ID", "instance-1");
        let _g2 = EnvGuard::set("DEPLOYMENT_ENVIRONMENT", "staging");

        let found = attribute_map(resource_attributes("proximity"));
        assert_eq!(found.get("service.name"), Some(&"proximity".to_string()));
        assert_eq!(
            found.get("service.version"),
            Some(&env!("CARGO_PKG_VERSION").to_string())
        );
        assert_eq!(
            found.get("service.instance.id"),
            Some(&"instance-1".to_string())
        );
        assert_eq!(
            found.get("deployment.environment"),
            Some(&"staging".to_string())
        );
    }

    #[test]
    #[serial]
    fn resource_attributes_hostname_fallback() {
        let _g1 = EnvGuard::unset("PROXIMITY_SERVICE_INSTANCE_ID");
        let _g2 = EnvGuard::set("HOSTNAME", "host-1");

        let found = attribute_map(resource_attributes("proximity"));
        assert_eq!(found.get("service.instance.id"), Some(&"host-1".to_string()));
    }

    #[test]
    #[serial]
    fn tracer_provider_needs_endpoint() {
        let _g = EnvGuard::unset("OTEL_EXPORTER_OTLP_ENDPOINT");
        assert!(build_tracer_provider("proximity").is_none());
    }

    #[test]
    fn header_extractor_ignores_invalid_utf8() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("tracestate", "congo=t61rcWkgMzE".parse().unwrap());
        headers.insert(
            "traceparent",
            axum::http::HeaderValue::from_bytes(b"\xFF").unwrap(),
        );
        let extractor = HeaderMapExtractor(&headers);
        assert!(extractor.get("traceparent").is_none());
        assert_eq!(extractor.get("tracestate"), Some("congo=t61rcWkgMzE"));
        assert_eq!(extractor.keys().len(), 2);
    }

    #[test]
    fn trace_context_extracts_span_context() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
                .parse()
                .unwrap(),
        );
        let context = trace_context_from_headers(&headers);
        let binding = context.span();
        let span_ctx = binding.span_context();
        assert!(span_ctx.is_valid());
        assert_eq!(
            span_ctx.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
    }

    #[test]
    fn missing_trace_headers_give_empty_context() {
        let context = trace_context_from_headers(&axum::http::HeaderMap::new());
        assert!(!context.span().span_context().is_valid());
    }

    async fn wait_for_listen(addr: SocketAddr) -> Result<(), String> {
        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(format!("server never became ready at {}", addr));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn init_observability_is_idempotent() {
        let handle1 = init_observability("proximity-test").expect("init");
        let handle2 = init_observability("proximity-test").expect("init again");
        let _ = (handle1.render(), handle2.render());
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn serve_metrics_renders_service_metrics() {
        let handle = init_observability("proximity-metrics-test").expect("init");
        metrics::counter!("proximity_submissions_total", "outcome" => "created").increment(1);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_metrics_with_listener(handle, listener, async move {
            let _ = shutdown_rx.await;
        }));
        wait_for_listen(addr).await.expect("server ready");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .no_proxy()
            .build()
            .expect("build test client");
        let body = client
            .get(format!("http://{addr}/metrics"))
            .send()
            .await
            .expect("GET /metrics")
            .error_for_status()
            .expect("metrics status")
            .text()
            .await
            .expect("body");
        assert!(body.contains("proximity_submissions_total"));

        let _ = shutdown_tx.send(());
        let _ = tokio::time::timeout(Duration::from_secs(1), server)
            .await
            .expect("server shutdown");
    }
}
