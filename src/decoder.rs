// src/decoder.rs
//! Turns a transport payload into typed articles.
//!
//! A payload is UTF-8 JSON holding either one article object or an array of
//! them. Missing fields are defaulted once here; anything that cannot be read
//! fails the whole payload, never a single article inside it.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::article::{Article, ArticleStatus};
use crate::error::{DecodeError, DecodeResult};

/// Label used when a payload omits `Source` or `Category`.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug)]
enum Payload {
    Single(WireArticle),
    Batch(Vec<WireArticle>),
}

impl Payload {
    fn from_value(value: Value) -> DecodeResult<Self> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(wire_article)
                .collect::<DecodeResult<Vec<_>>>()
                .map(Payload::Batch),
            other => wire_article(other).map(Payload::Single),
        }
    }

    fn into_items(self) -> Vec<WireArticle> {
        match self {
            Payload::Batch(items) => items,
            Payload::Single(item) => vec![item],
        }
    }
}

fn wire_article(value: Value) -> DecodeResult<WireArticle> {
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        Value::Array(_) => Err(DecodeError::UnexpectedShape("nested array")),
        Value::String(_) => Err(DecodeError::UnexpectedShape("string")),
        Value::Number(_) => Err(DecodeError::UnexpectedShape("number")),
        Value::Bool(_) => Err(DecodeError::UnexpectedShape("boolean")),
        Value::Null => Err(DecodeError::UnexpectedShape("null")),
    }
}

/// Loose wire shape: every field optional, unknown keys ignored.
///
/// The numeric and list fields only default when the key is absent; an
/// explicit `null` there is a type error like any other.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct WireArticle {
    article_id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    author: Option<String>,
    source: Option<String>,
    category: Option<String>,
    published_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "present")]
    view_count: Option<u64>,
    #[serde(deserialize_with = "present")]
    sentiment_score: Option<f64>,
    status: Option<String>,
    #[serde(deserialize_with = "present")]
    tags: Option<Vec<String>>,
}

/// Only runs when the key exists, so `null` reaches `T` and is rejected.
fn present<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

impl WireArticle {
    fn into_article(self) -> DecodeResult<Article> {
        let sentiment_score = self.sentiment_score.unwrap_or(0.0);
        if !sentiment_score.is_finite() || !(-1.0..=1.0).contains(&sentiment_score) {
            return Err(DecodeError::InvalidField {
                field: "SentimentScore",
                reason: format!("{sentiment_score} is outside [-1.0, 1.0]"),
            });
        }

        Ok(Article {
            article_id: self.article_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            source: self.source.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            category: self.category.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            published_date: self.published_date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            view_count: self.view_count.unwrap_or(0),
            sentiment_score,
            status: self.status.map(ArticleStatus::from).unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
        })
    }
}

/// Decode one transport payload into its articles.
pub fn parse(raw: &[u8]) -> DecodeResult<Vec<Article>> {
    let text = std::str::from_utf8(raw)?;
    let value: Value = serde_json::from_str(text)?;
    Payload::from_value(value)?
        .into_items()
        .into_iter()
        .map(WireArticle::into_article)
        .collect()
}
