// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scheduler::TriggerSchedule;

pub const ENV_CONFIG_PATH: &str = "PIPELINE_CONFIG_PATH";
pub const ENV_METRICS_ADDR: &str = "METRICS_ADDR";
pub const DEFAULT_SCHEDULE: &str = "0,10,20,30,40,50 * * * * *";

fn default_schedule() -> String {
    DEFAULT_SCHEDULE.to_string()
}
fn default_run_on_startup() -> bool {
    true
}
fn default_hub_name() -> String {
    "news".to_string()
}
fn default_connection_setting() -> String {
    "EventHubConnection".to_string()
}
fn default_channel_capacity() -> usize {
    64
}
fn default_max_delivery_batch() -> usize {
    16
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Six-field cron-style trigger expression (seconds first).
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
    /// Stream (hub) the generator publishes to.
    #[serde(default = "default_hub_name")]
    pub hub_name: String,
    /// Name of the env var holding the stream connection string.
    #[serde(default = "default_connection_setting")]
    pub connection_setting: String,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Max transport events handed to one processor invocation.
    #[serde(default = "default_max_delivery_batch")]
    pub max_delivery_batch: usize,
    /// e.g. "0.0.0.0:9100"; no metrics endpoint when unset.
    #[serde(default)]
    pub metrics_addr: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            run_on_startup: default_run_on_startup(),
            hub_name: default_hub_name(),
            connection_setting: default_connection_setting(),
            channel_capacity: default_channel_capacity(),
            max_delivery_batch: default_max_delivery_batch(),
            metrics_addr: None,
        }
    }
}

impl PipelineConfig {
    /// Parsed trigger schedule.
    pub fn trigger_schedule(&self) -> Result<TriggerSchedule> {
        self.schedule
            .parse::<TriggerSchedule>()
            .with_context(|| format!("invalid schedule {:?}", self.schedule))
    }

    fn sanitize(mut self) -> Result<Self> {
        if self.channel_capacity == 0 {
            self.channel_capacity = default_channel_capacity();
        }
        if self.max_delivery_batch == 0 {
            self.max_delivery_batch = default_max_delivery_batch();
        }
        if self.hub_name.trim().is_empty() {
            self.hub_name = default_hub_name();
        }
        if let Ok(addr) = std::env::var(ENV_METRICS_ADDR) {
            if !addr.trim().is_empty() {
                self.metrics_addr = Some(addr.trim().to_string());
            }
        }
        self.trigger_schedule()?;
        Ok(self)
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading pipeline config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg: PipelineConfig = match ext.as_str() {
        "json" => serde_json::from_str(&content).context("parsing pipeline config json")?,
        _ => toml::from_str(&content).context("parsing pipeline config toml")?,
    };
    cfg.sanitize()
}

/// Load config using env var + fallbacks:
/// 1) $PIPELINE_CONFIG_PATH
/// 2) config/pipeline.toml
/// 3) config/pipeline.json
/// 4) built-in defaults
pub fn load_default() -> Result<PipelineConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/pipeline.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/pipeline.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    PipelineConfig::default().sanitize()
}
