use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "news_articles_generated_total",
            "Articles synthesized by the generator."
        );
        describe_counter!(
            "news_batches_published_total",
            "Batches handed to the stream transport."
        );
        describe_counter!(
            "news_publish_errors_total",
            "Batches the stream transport refused."
        );
        describe_counter!("news_invocations_total", "Processor invocations.");
        describe_counter!(
            "news_articles_processed_total",
            "Articles decoded and summarized by the processor."
        );
        describe_counter!(
            "news_events_failed_total",
            "Transport events that failed to decode."
        );
        describe_histogram!(
            "news_delivery_articles",
            "Decoded articles per processor invocation."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide Prometheus recorder.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Wrap an existing handle (e.g. from a locally scoped recorder).
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Returns a router exposing `/metrics` (Prometheus text format) and `/healthz`.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new()
            .route(
                "/metrics",
                get(move || {
                    let h = handle.clone();
                    async move { h.render() }
                }),
            )
            .route("/healthz", get(|| async { "ok" }))
    }

    /// Serve the router until the listener fails.
    pub async fn serve(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding metrics listener on {addr}"))?;
        tracing::info!(%addr, "metrics endpoint listening");
        axum::serve(listener, self.router())
            .await
            .context("metrics server")
    }
}
