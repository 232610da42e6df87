//! Per-article derived signals. Pure, no I/O; never stored on the article.

use serde::Serialize;

use crate::article::{Article, ArticleStatus};

/// Views at or above this mark an article as high-engagement ("viral").
pub const HIGH_ENGAGEMENT_VIEWS: u64 = 5_000;
/// Absolute sentiment at or above this counts as strong.
pub const STRONG_SENTIMENT_THRESHOLD: f64 = 0.7;
/// Tag count at or above this counts as well-tagged.
pub const WELL_TAGGED_MIN_TAGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DerivedSignals {
    pub high_engagement: bool,
    /// `Some` only when the sentiment is strong.
    pub strong_sentiment: Option<Polarity>,
    pub well_tagged: bool,
    pub status_is_featured: bool,
}

impl DerivedSignals {
    pub fn is_strong_sentiment(&self) -> bool {
        self.strong_sentiment.is_some()
    }
}

pub fn evaluate(article: &Article) -> DerivedSignals {
    let s = article.sentiment_score;
    let strong_sentiment = (s.abs() >= STRONG_SENTIMENT_THRESHOLD).then(|| {
        if s > 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    });

    DerivedSignals {
        high_engagement: article.view_count >= HIGH_ENGAGEMENT_VIEWS,
        strong_sentiment,
        well_tagged: article.tags.len() >= WELL_TAGGED_MIN_TAGS,
        status_is_featured: article.status == ArticleStatus::Featured,
    }
}
