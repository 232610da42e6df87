// src/scheduler.rs
//! Drives the pipeline: the generator on a cron-style cadence, the processor
//! once per stream delivery.
//!
//! Only the seconds field of the six-field expression is interpreted
//! (`*`, `*/n`, or a list like `0,10,20,30,40,50`); the minute, hour,
//! day-of-month, month and day-of-week fields must be `*`.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Timelike, Utc};
use metrics::counter;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::aggregator::BatchSummary;
use crate::config::PipelineConfig;
use crate::generator::Generator;
use crate::processor::Processor;
use crate::transport::{StreamReceiver, StreamTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSchedule {
    /// Sorted, de-duplicated, non-empty, each in 0..=59.
    seconds: Vec<u32>,
}

impl TriggerSchedule {
    pub fn seconds(&self) -> &[u32] {
        &self.seconds
    }

    /// Next whole second strictly after `now` whose seconds-of-minute matches.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let base = now.with_nanosecond(0).unwrap_or(now);
        let sec = base.second();
        let minute_start = base - Duration::seconds(i64::from(sec));
        match self.seconds.iter().find(|&&s| s > sec) {
            Some(&s) => minute_start + Duration::seconds(i64::from(s)),
            None => minute_start + Duration::seconds(60 + i64::from(self.seconds[0])),
        }
    }
}

impl FromStr for TriggerSchedule {
    type Err = anyhow::Error;

    fn from_str(expr: &str) -> Result<Self> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 6 {
            bail!(
                "expected 6 fields (sec min hour dom mon dow), got {}",
                fields.len()
            );
        }
        if let Some(f) = fields[1..].iter().find(|f| **f != "*") {
            bail!("only the seconds field may be restricted, found {f:?}");
        }
        Ok(Self {
            seconds: parse_seconds(fields[0])?,
        })
    }
}

fn parse_seconds(field: &str) -> Result<Vec<u32>> {
    let mut out: Vec<u32> = if field == "*" {
        (0..60).collect()
    } else if let Some(step) = field.strip_prefix("*/") {
        let n: usize = step
            .parse()
            .with_context(|| format!("invalid step {step:?}"))?;
        if !(1..=59).contains(&n) {
            bail!("step must be within 1..=59, got {n}");
        }
        (0..60).step_by(n).collect()
    } else {
        field
            .split(',')
            .map(|part| {
                let s: u32 = part
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid second {part:?}"))?;
                if s > 59 {
                    bail!("second out of range: {s}");
                }
                Ok(s)
            })
            .collect::<Result<Vec<u32>>>()?
    };
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// Explicit replacement for host-managed trigger bindings.
#[derive(Debug, Clone)]
pub struct Scheduler {
    schedule: TriggerSchedule,
    run_on_startup: bool,
}

impl Scheduler {
    pub fn new(schedule: TriggerSchedule, run_on_startup: bool) -> Self {
        Self {
            schedule,
            run_on_startup,
        }
    }

    pub fn from_config(cfg: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(cfg.trigger_schedule()?, cfg.run_on_startup))
    }

    pub fn schedule(&self) -> &TriggerSchedule {
        &self.schedule
    }

    /// Run `generator` on the schedule, publishing each batch to `transport`.
    /// Each tick is independent; a failed publish is logged and counted.
    pub fn spawn_generator<R, T>(
        &self,
        mut generator: Generator<R>,
        transport: Arc<T>,
    ) -> JoinHandle<()>
    where
        R: Rng + Send + 'static,
        T: StreamTransport + ?Sized + 'static,
    {
        let schedule = self.schedule.clone();
        let run_on_startup = self.run_on_startup;
        tokio::spawn(async move {
            if run_on_startup {
                generate_and_publish(&mut generator, transport.as_ref()).await;
            }
            // Deadlines advance from the previous one so an early wake-up
            // cannot fire the same second twice.
            let mut prev = Utc::now();
            loop {
                let now = Utc::now();
                let next = schedule.next_after(prev.max(now));
                let wait = (next - now).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;
                prev = next;
                generate_and_publish(&mut generator, transport.as_ref()).await;
            }
        })
    }

    /// Invoke `processor` once per delivery, each on its own task. Summaries
    /// are forwarded to `summaries` when given. Ends when the stream closes
    /// and every in-flight invocation has finished.
    pub fn spawn_processor(
        &self,
        mut receiver: StreamReceiver,
        processor: Processor,
        summaries: Option<mpsc::UnboundedSender<BatchSummary>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut inflight = JoinSet::new();
            loop {
                tokio::select! {
                    delivery = receiver.next_delivery() => {
                        let Some(delivery) = delivery else { break };
                        let tx = summaries.clone();
                        inflight.spawn(async move {
                            let summary = processor.on_batch(delivery.as_slice());
                            if let Some(tx) = tx {
                                let _ = tx.send(summary);
                            }
                        });
                    }
                    Some(done) = inflight.join_next(), if !inflight.is_empty() => {
                        if let Err(e) = done {
                            tracing::error!(target: "news", error = %e, "invocation task failed");
                        }
                    }
                }
            }
            while let Some(done) = inflight.join_next().await {
                if let Err(e) = done {
                    tracing::error!(target: "news", error = %e, "invocation task failed");
                }
            }
            tracing::info!(target: "news", "stream closed, processor loop exiting");
        })
    }
}

async fn generate_and_publish<R, T>(generator: &mut Generator<R>, transport: &T)
where
    R: Rng,
    T: StreamTransport + ?Sized,
{
    let (count, body) = match generator.tick() {
        Ok(out) => out,
        Err(e) => {
            tracing::error!(target: "news", error = %e, "failed to encode batch");
            return;
        }
    };

    match transport.publish(body).await {
        Ok(()) => {
            counter!("news_batches_published_total").increment(1);
            tracing::info!(
                target: "news",
                articles = count,
                hub = transport.hub_name(),
                "successfully generated {count} news articles"
            );
        }
        Err(e) => {
            counter!("news_publish_errors_total").increment(1);
            tracing::warn!(
                target: "news",
                error = ?e,
                hub = transport.hub_name(),
                "publish failed"
            );
        }
    }
}
