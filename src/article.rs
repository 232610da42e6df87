//! # Article Model
//! The news record carried through the pipeline and its wire representation.
//!
//! Wire keys are PascalCase (`ArticleId`, `ViewCount`, ...) and `PublishedDate`
//! is an RFC 3339 timestamp. A batch travels as a JSON array of these objects.

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordered group of articles carried in one transport payload.
pub type Batch = Vec<Article>;

static ARTICLE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^NEWS-\d{8}-[0-9A-F]{8}$").expect("valid article id regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Article {
    pub article_id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub source: String,
    pub category: String,
    pub published_date: DateTime<Utc>,
    pub view_count: u64,
    pub sentiment_score: f64,
    pub status: ArticleStatus,
    pub tags: Vec<String>,
}

impl Article {
    /// Single-object wire form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// True when the id has the generator's `NEWS-YYYYMMDD-XXXXXXXX` shape.
    pub fn has_canonical_id(&self) -> bool {
        ARTICLE_ID_RE.is_match(&self.article_id)
    }
}

/// Encode a batch as a JSON array.
pub fn encode_batch(articles: &[Article]) -> serde_json::Result<String> {
    serde_json::to_string(articles)
}

/// Publication status. The generator only emits `Published` and `Featured`;
/// anything else read off the wire is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArticleStatus {
    #[default]
    Published,
    Featured,
    Other(String),
}

impl ArticleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ArticleStatus::Published => "Published",
            ArticleStatus::Featured => "Featured",
            ArticleStatus::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for ArticleStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Published" => ArticleStatus::Published,
            "Featured" => ArticleStatus::Featured,
            _ => ArticleStatus::Other(s),
        }
    }
}

impl From<ArticleStatus> for String {
    fn from(s: ArticleStatus) -> Self {
        match s {
            ArticleStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
