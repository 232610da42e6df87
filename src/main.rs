//! News Stream Pipeline — Binary Entrypoint
//! Wires the generator, an in-memory stream and the processor, then runs
//! until Ctrl-C. Optionally exposes `/metrics` and `/healthz`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_stream_pipeline::{
    config, in_memory, metrics::Metrics, Generator, Processor, Scheduler, StreamConnection,
};

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
/// Filter comes from `RUST_LOG`, falling back to `news=info,warn`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("news=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = config::load_default().context("loading pipeline config")?;
    tracing::info!(
        schedule = %cfg.schedule,
        hub = %cfg.hub_name,
        run_on_startup = cfg.run_on_startup,
        "pipeline config loaded"
    );

    // The handle belongs to the external stream; only its presence is reported.
    match StreamConnection::from_env(&cfg.connection_setting) {
        Ok(_) => tracing::info!(setting = %cfg.connection_setting, "stream connection configured"),
        Err(e) => tracing::warn!("{e:#}; using the in-memory stream only"),
    }

    if let Some(addr) = cfg.metrics_addr.clone() {
        let metrics = Metrics::init()?;
        tokio::spawn(async move {
            if let Err(e) = metrics.serve(&addr).await {
                tracing::warn!("metrics server stopped: {e:#}");
            }
        });
    }

    let scheduler = Scheduler::from_config(&cfg)?;
    let (stream, receiver) = in_memory(
        cfg.hub_name.clone(),
        cfg.channel_capacity,
        cfg.max_delivery_batch,
    );

    let producer = scheduler.spawn_generator(Generator::from_os_rng(), Arc::new(stream));
    let consumer = scheduler.spawn_processor(receiver, Processor::new(), None);

    tokio::signal::ctrl_c()
        .await
        .context("waiting for ctrl-c")?;
    tracing::info!("shutting down");

    producer.abort();
    let _ = producer.await;
    let _ = consumer.await;
    Ok(())
}
