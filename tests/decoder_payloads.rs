// tests/decoder_payloads.rs
use chrono::{TimeZone, Utc};
use news_stream_pipeline::{encode_batch, parse, Article, ArticleStatus, Generator};

fn handpicked() -> Article {
    Article {
        article_id: "NEWS-20250102-DEADBEEF".into(),
        title: "Technology Breakthrough in Quantum Computing".into(),
        content: "Comprehensive coverage of the latest developments in Quantum Computing. "
            .repeat(12),
        author: "Lisa Zhang".into(),
        source: "Innovation Weekly".into(),
        category: "Technology".into(),
        published_date: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::microseconds(123_456),
        view_count: 9_876,
        sentiment_score: 0.73,
        status: ArticleStatus::Featured,
        tags: vec![
            "Quantum Computing".into(),
            "Quantum Computing".into(),
            "Artificial Intelligence".into(),
        ],
    }
}

#[test]
fn encode_then_decode_preserves_every_field() {
    let a = handpicked();
    let decoded = parse(a.to_json().unwrap().as_bytes()).unwrap();
    assert_eq!(decoded, vec![a]);
}

#[test]
fn generated_batches_survive_the_wire() {
    let batch = Generator::seeded(99).generate_batch();
    let body = encode_batch(&batch).unwrap();
    assert_eq!(parse(body.as_bytes()).unwrap(), batch);
}

#[test]
fn single_object_and_one_element_array_are_equivalent() {
    let a = handpicked();
    let single = a.to_json().unwrap();
    let array = encode_batch(std::slice::from_ref(&a)).unwrap();
    assert!(array.starts_with('['));

    let from_single = parse(single.as_bytes()).unwrap();
    let from_array = parse(array.as_bytes()).unwrap();
    assert_eq!(from_single.len(), 1);
    assert_eq!(from_single, from_array);
}

#[test]
fn offset_timestamps_are_normalized_to_utc() {
    let raw = br#"{"ArticleId":"x","PublishedDate":"2025-01-02T05:04:05+02:00"}"#;
    let out = parse(raw).unwrap();
    assert_eq!(
        out[0].published_date,
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    );
}

#[test]
fn odd_articles_inside_a_good_array_are_defaulted_not_rejected() {
    let raw = br#"[
        {"ArticleId": "NEWS-20250102-00000001", "ViewCount": 6000, "Tags": ["a","b","c","d","e"]},
        {"Unexpected": true}
    ]"#;
    let out = parse(raw).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].view_count, 0);
    assert_eq!(out[1].article_id, "");
}
