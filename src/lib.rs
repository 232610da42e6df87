// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregator;
pub mod article;
pub mod config;
pub mod decoder;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod processor;
pub mod scheduler;
pub mod signals;
pub mod transport;

// ---- Re-exports for stable public API ----
pub use crate::aggregator::{summarize, BatchSummary, FrequencyTable};
pub use crate::article::{encode_batch, Article, ArticleStatus, Batch};
pub use crate::config::PipelineConfig;
pub use crate::decoder::parse;
pub use crate::error::DecodeError;
pub use crate::generator::Generator;
pub use crate::processor::Processor;
pub use crate::scheduler::{Scheduler, TriggerSchedule};
pub use crate::signals::{evaluate, DerivedSignals, Polarity};
pub use crate::transport::{in_memory, StreamConnection, StreamTransport};
