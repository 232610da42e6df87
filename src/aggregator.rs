//! # Aggregator
//! Reduces one processor invocation's decoded articles into a [`BatchSummary`].
//!
//! Totals, averages, status/category/source frequencies and signal counts are
//! computed in a single pass. Averages over an empty input are 0.
//!
//! Top-N ties are broken by first-encountered order within the input. That is
//! deterministic for a given input order here, but it is not a guarantee that
//! other implementations (or a different delivery order) will match.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::article::Article;
use crate::signals::evaluate;

/// How many categories/sources a summary reports.
pub const TOP_N: usize = 3;

/// Insertion-ordered frequency counts.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map(|&pos| self.entries[pos].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// The `n` most frequent keys; equal counts keep first-encountered order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        // stable sort keeps insertion order among ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl PartialEq for FrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<String> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.record(&key);
        }
        table
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, n) in &self.entries {
            map.serialize_entry(k, n)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BatchSummary {
    /// Transport events handed to the invocation.
    pub events: usize,
    /// Successfully decoded articles across all events.
    pub total: usize,
    /// Events that failed to decode.
    pub failed: usize,
    pub total_views: u64,
    /// Floor of `total_views / total`.
    pub avg_views: u64,
    pub avg_sentiment: f64,
    pub status_counts: FrequencyTable,
    pub top_categories: Vec<(String, usize)>,
    pub top_sources: Vec<(String, usize)>,
    pub viral_count: usize,
    pub well_tagged_count: usize,
    pub strong_sentiment_count: usize,
}

pub fn summarize(articles: &[Article], failed: usize, events: usize) -> BatchSummary {
    let total = articles.len();

    let mut total_views: u64 = 0;
    let mut sentiment_sum: f64 = 0.0;
    let mut status_counts = FrequencyTable::new();
    let mut categories = FrequencyTable::new();
    let mut sources = FrequencyTable::new();
    let (mut viral_count, mut well_tagged_count, mut strong_sentiment_count) = (0, 0, 0);

    for a in articles {
        total_views = total_views.saturating_add(a.view_count);
        sentiment_sum += a.sentiment_score;
        status_counts.record(a.status.as_str());
        categories.record(&a.category);
        sources.record(&a.source);

        let sig = evaluate(a);
        viral_count += usize::from(sig.high_engagement);
        well_tagged_count += usize::from(sig.well_tagged);
        strong_sentiment_count += usize::from(sig.is_strong_sentiment());
    }

    let (avg_views, avg_sentiment) = if total > 0 {
        (total_views / total as u64, sentiment_sum / total as f64)
    } else {
        (0, 0.0)
    };

    BatchSummary {
        events,
        total,
        failed,
        total_views,
        avg_views,
        avg_sentiment,
        status_counts,
        top_categories: categories.top(TOP_N),
        top_sources: sources.top(TOP_N),
        viral_count,
        well_tagged_count,
        strong_sentiment_count,
    }
}
