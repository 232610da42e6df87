// src/processor.rs
//! One consumer invocation: decode every event of a delivery, log notable
//! articles, and summarize.
//!
//! Failures are isolated per event. A payload that cannot be decoded bumps
//! `failed` and the rest of the delivery is still processed.

use std::time::Instant;

use metrics::{counter, histogram};

use crate::aggregator::{summarize, BatchSummary};
use crate::article::Article;
use crate::decoder;
use crate::metrics::ensure_metrics_described;
use crate::signals::evaluate;

/// Stateless batch processor; clone freely across concurrent invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Processor;

impl Processor {
    pub fn new() -> Self {
        Self
    }

    /// Delivery carrying a single event.
    pub fn on_event(&self, payload: &[u8]) -> BatchSummary {
        self.on_batch(&[payload])
    }

    /// Process every event of one delivery and return its summary.
    pub fn on_batch<P: AsRef<[u8]>>(&self, events: &[P]) -> BatchSummary {
        ensure_metrics_described();
        let t0 = Instant::now();

        let mut articles: Vec<Article> = Vec::new();
        let mut failed = 0usize;

        for event in events {
            match decoder::parse(event.as_ref()) {
                Ok(decoded) => {
                    for a in &decoded {
                        log_article(a);
                    }
                    articles.extend(decoded);
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(target: "news", error = %e, "error processing event");
                }
            }
        }

        let summary = summarize(&articles, failed, events.len());

        counter!("news_invocations_total").increment(1);
        counter!("news_articles_processed_total").increment(summary.total as u64);
        counter!("news_events_failed_total").increment(summary.failed as u64);
        histogram!("news_delivery_articles").record(summary.total as f64);

        log_summary(&summary);
        tracing::debug!(
            target: "news",
            elapsed_ms = t0.elapsed().as_secs_f64() * 1_000.0,
            "invocation finished"
        );
        summary
    }
}

fn log_article(a: &Article) {
    let sig = evaluate(a);
    let id = a.article_id.as_str();

    if !a.has_canonical_id() {
        tracing::debug!(target: "news", article_id = id, "non-canonical article id");
    }

    if sig.high_engagement {
        tracing::info!(
            target: "news",
            article_id = id,
            views = a.view_count,
            sentiment = a.sentiment_score,
            "viral article: {} views",
            group_thousands(a.view_count)
        );
    }

    if sig.status_is_featured {
        tracing::info!(target: "news", article_id = id, "featured article");
    } else {
        tracing::info!(
            target: "news",
            article_id = id,
            status = %a.status,
            "article remains published"
        );
    }

    if let Some(polarity) = sig.strong_sentiment {
        tracing::info!(
            target: "news",
            article_id = id,
            polarity = polarity.as_str(),
            "strong {} sentiment ({:.2})",
            polarity.as_str(),
            a.sentiment_score
        );
    }

    if sig.well_tagged {
        tracing::info!(
            target: "news",
            article_id = id,
            tags = a.tags.len(),
            "well-tagged article"
        );
    }

    tracing::info!(
        target: "news",
        article_id = id,
        title = %a.title,
        author = %a.author,
        "processed article"
    );
}

fn log_summary(s: &BatchSummary) {
    tracing::info!(
        target: "news",
        total = s.total,
        failed = s.failed,
        events = s.events,
        "processed {} news articles, {} failed in batch of {}",
        s.total,
        s.failed,
        s.events
    );

    if s.total == 0 {
        return;
    }

    let statuses = s
        .status_counts
        .iter()
        .map(|(k, n)| format!("{k}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(
        target: "news",
        "news batch summary: {} articles | total views: {} | avg views: {} | avg sentiment: {:.2} | status: [{}]",
        s.total,
        group_thousands(s.total_views),
        group_thousands(s.avg_views),
        s.avg_sentiment,
        statuses
    );
    tracing::info!(
        target: "news",
        "top categories: [{}] | top sources: [{}]",
        join_counts(&s.top_categories),
        join_counts(&s.top_sources)
    );

    if s.viral_count > 0 {
        tracing::info!(target: "news", count = s.viral_count, "viral articles in batch");
    }
    if s.strong_sentiment_count > 0 {
        tracing::info!(
            target: "news",
            count = s.strong_sentiment_count,
            "strong sentiment articles in batch"
        );
    }
    if s.well_tagged_count > 0 {
        tracing::info!(target: "news", count = s.well_tagged_count, "well-tagged articles in batch");
    }
}

fn join_counts(items: &[(String, usize)]) -> String {
    items
        .iter()
        .map(|(k, n)| format!("{k}: {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `15000` -> `15,000`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(15_000), "15,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn single_event_matches_batch_of_one() {
        let raw = br#"{"ArticleId":"NEWS-20250101-ABCDEF01","ViewCount":7000,"Category":"Health"}"#;
        let p = Processor::new();
        assert_eq!(p.on_event(raw), p.on_batch(&[raw.as_slice()]));
    }

    #[test]
    fn all_failed_still_reports() {
        let s = Processor::new().on_batch(&["{", "nope"]);
        assert_eq!(s.total, 0);
        assert_eq!(s.failed, 2);
        assert_eq!(s.events, 2);
    }
}
