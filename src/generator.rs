// src/generator.rs
//! Synthetic news generator. Each tick produces a burst of 3–8 articles.
//!
//! The random source is injected so tests can seed it; production uses
//! [`Generator::from_os_rng`].

use chrono::{DateTime, Utc};
use metrics::counter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::article::{encode_batch, Article, ArticleStatus, Batch};

pub const MIN_BATCH: usize = 3;
pub const MAX_BATCH: usize = 8;
pub const MIN_VIEWS: u64 = 100;
pub const MAX_VIEWS: u64 = 10_000;
pub const MIN_TAGS: usize = 3;
pub const MAX_TAGS: usize = 5;
const MIN_SENTENCES: usize = 10;
const MAX_SENTENCES: usize = 20;

const TOPIC_SLOT: &str = "{topic}";

pub const TITLE_TEMPLATES: &[&str] = &[
    "Breaking: Major Discovery in {topic}",
    "New {topic} Study Reveals Surprising Benefits",
    "{topic} Industry Faces Major Transformation",
    "Global Markets Show Strong Recovery Amid {topic}",
    "International Trade Agreements Reshape {topic}",
    "Sports Stars Unite for {topic}",
    "Cultural Festival Celebrates {topic}",
    "Technology Breakthrough in {topic}",
];

pub const TOPICS: &[&str] = &[
    "Renewable Energy Technology",
    "Artificial Intelligence",
    "Climate Change",
    "Space Exploration",
    "Healthcare Innovation",
    "Economic Policy",
    "Sports Excellence",
    "Cultural Diversity",
    "Quantum Computing",
    "Sustainable Agriculture",
];

pub const AUTHORS: &[&str] = &[
    "Sarah Johnson",
    "Michael Chen",
    "Emily Rodriguez",
    "David Kim",
    "Lisa Zhang",
    "Alex Thompson",
    "Maria Garcia",
    "James Wilson",
];

pub const SOURCES: &[&str] = &[
    "Tech Today",
    "Health Herald",
    "Finance Focus",
    "Sports Spotlight",
    "Culture Corner",
    "Science Daily",
    "Global News",
    "Innovation Weekly",
];

pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Health",
    "Business",
    "Sports",
    "Culture",
    "Science",
];

/// Produces batches of synthetic articles from an injected random source.
#[derive(Debug)]
pub struct Generator<R> {
    rng: R,
}

impl Generator<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible generator for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One batch stamped with the current UTC time.
    pub fn generate_batch(&mut self) -> Batch {
        self.generate_batch_at(Utc::now())
    }

    /// One batch stamped with `now`.
    pub fn generate_batch_at(&mut self, now: DateTime<Utc>) -> Batch {
        let size = self.rng.random_range(MIN_BATCH..=MAX_BATCH);
        (0..size).map(|_| self.generate_article(now)).collect()
    }

    /// Generate a batch and serialize it for the stream.
    /// Returns the article count alongside the JSON array body.
    pub fn tick(&mut self) -> serde_json::Result<(usize, String)> {
        tracing::info!(target: "news", at = %Utc::now(), "news generator started");
        let batch = self.generate_batch();
        let body = encode_batch(&batch)?;
        counter!("news_articles_generated_total").increment(batch.len() as u64);
        Ok((batch.len(), body))
    }

    fn generate_article(&mut self, now: DateTime<Utc>) -> Article {
        let topic = self.pick(TOPICS);
        let title = self.pick(TITLE_TEMPLATES).replace(TOPIC_SLOT, topic);

        let sentences = self.rng.random_range(MIN_SENTENCES..=MAX_SENTENCES);
        let content =
            format!("Comprehensive coverage of the latest developments in {topic}. ")
                .repeat(sentences);

        let author = self.pick(AUTHORS).to_string();
        let source = self.pick(SOURCES).to_string();
        let category = self.pick(CATEGORIES).to_string();

        let view_count = self.rng.random_range(MIN_VIEWS..=MAX_VIEWS);
        let sentiment_score = round2(self.rng.random_range(-1.0..=1.0));
        let status = if self.rng.random_bool(0.5) {
            ArticleStatus::Published
        } else {
            ArticleStatus::Featured
        };

        let tag_count = self.rng.random_range(MIN_TAGS..=MAX_TAGS);
        let tags = (0..tag_count)
            .map(|_| self.pick(TOPICS).to_string())
            .collect();

        Article {
            article_id: self.article_id(now),
            title,
            content,
            author,
            source,
            category,
            published_date: now,
            view_count,
            sentiment_score,
            status,
            tags,
        }
    }

    /// `NEWS-<YYYYMMDD>-<8 uppercase hex>`; collisions are not guarded against.
    fn article_id(&mut self, now: DateTime<Utc>) -> String {
        let suffix: u32 = self.rng.random();
        format!("NEWS-{}-{:08X}", now.format("%Y%m%d"), suffix)
    }

    // Vocabularies are non-empty constants; an empty one panics here.
    fn pick(&mut self, vocab: &'static [&'static str]) -> &'static str {
        vocab[self.rng.random_range(0..vocab.len())]
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
