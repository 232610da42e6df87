// tests/aggregator_summary.rs
use chrono::Utc;
use news_stream_pipeline::{summarize, Article, ArticleStatus};

fn article(views: u64, sentiment: f64, category: &str, source: &str) -> Article {
    Article {
        article_id: format!("NEWS-20250101-{views:08X}"),
        title: "title".into(),
        content: "content".into(),
        author: "author".into(),
        source: source.into(),
        category: category.into(),
        published_date: Utc::now(),
        view_count: views,
        sentiment_score: sentiment,
        status: ArticleStatus::Published,
        tags: vec!["t".into(); 3],
    }
}

#[test]
fn three_article_reference_batch() {
    let batch = vec![
        article(100, 0.0, "Health", "Health Herald"),
        article(5_000, 0.75, "Science", "Science Daily"),
        article(9_900, -0.8, "Science", "Global News"),
    ];
    let s = summarize(&batch, 0, 1);

    assert_eq!(s.total, 3);
    assert_eq!(s.total_views, 15_000);
    assert_eq!(s.avg_views, 5_000);
    assert!((s.avg_sentiment - (-0.016_666_666)).abs() < 1e-6);
    assert_eq!(s.viral_count, 2);
    assert_eq!(s.strong_sentiment_count, 2);
    assert_eq!(s.well_tagged_count, 0);
    assert_eq!(s.status_counts.get("Published"), 3);
    assert_eq!(s.top_categories[0], ("Science".to_string(), 2));
}

#[test]
fn avg_views_is_floored() {
    let batch = vec![article(100, 0.0, "A", "S"), article(101, 0.0, "A", "S")];
    assert_eq!(summarize(&batch, 0, 1).avg_views, 100);
}

#[test]
fn empty_batch_has_no_division_fault() {
    let s = summarize(&[], 0, 0);
    assert_eq!(s.total, 0);
    assert_eq!(s.total_views, 0);
    assert_eq!(s.avg_views, 0);
    assert_eq!(s.avg_sentiment, 0.0);
    assert_eq!(s.viral_count + s.strong_sentiment_count + s.well_tagged_count, 0);
}

#[test]
fn top_three_categories_with_a_tie() {
    let mut batch = Vec::new();
    for (cat, n) in [("A", 5), ("B", 5), ("C", 3), ("D", 1)] {
        for _ in 0..n {
            batch.push(article(200, 0.1, cat, "S"));
        }
    }
    let s = summarize(&batch, 0, 1);
    let names: Vec<&str> = s.top_categories.iter().map(|(k, _)| k.as_str()).collect();

    assert_eq!(names.len(), 3);
    assert!(names.contains(&"A"));
    assert!(names.contains(&"B"));
    assert!(names.contains(&"C"));
    assert!(!names.contains(&"D"));
    // same input order, same answer
    assert_eq!(summarize(&batch, 0, 1).top_categories, s.top_categories);
}

#[test]
fn unexpected_status_values_are_counted_literally() {
    let mut a = article(300, 0.0, "A", "S");
    a.status = ArticleStatus::Other("Retracted".into());
    let mut b = article(300, 0.0, "A", "S");
    b.status = ArticleStatus::Featured;
    let s = summarize(&[a, b], 0, 1);
    assert_eq!(s.status_counts.get("Retracted"), 1);
    assert_eq!(s.status_counts.get("Featured"), 1);
    assert_eq!(s.status_counts.len(), 2);
}

#[test]
fn summary_serializes_for_structured_output() {
    let s = summarize(&[article(5_000, 0.9, "A", "S")], 1, 2);
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["total"], 1);
    assert_eq!(v["failed"], 1);
    assert_eq!(v["events"], 2);
    assert_eq!(v["status_counts"]["Published"], 1);
    assert_eq!(v["top_sources"][0][0], "S");
}
