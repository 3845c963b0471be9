// tests/ingest_dedup.rs
use aws_newsroom::ingest::dedup::{dedup_by_source_id, Deduper};
use aws_newsroom::ingest::types::{AdditionalFields, ItemBody, RawItem};

fn item(id: &str, headline: &str) -> RawItem {
    RawItem {
        item: ItemBody {
            id: id.to_string(),
            name: String::new(),
            author: None,
            date_created: None,
            date_updated: None,
            additional_fields: AdditionalFields {
                headline: Some(headline.to_string()),
                ..Default::default()
            },
        },
        tags: vec![],
    }
}

#[test]
fn repeated_source_id_keeps_only_first_occurrence() {
    let raw = vec![
        item("dup", "first copy"),
        item("other", "untouched"),
        item("dup", "second copy"),
        item("dup", "third copy"),
    ];

    let out = dedup_by_source_id(raw);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].item.id, "dup");
    assert_eq!(
        out[0].item.additional_fields.headline.as_deref(),
        Some("first copy")
    );
    assert_eq!(out[1].item.id, "other");
}

#[test]
fn order_is_preserved_for_unique_ids() {
    let raw = vec![item("c", "c"), item("a", "a"), item("b", "b")];
    let ids: Vec<String> = dedup_by_source_id(raw)
        .into_iter()
        .map(|i| i.item.id)
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn deduper_seen_set_spans_batches() {
    let mut dedup = Deduper::new();
    // first page admits both
    assert!(!dedup.is_duplicate("a"));
    assert!(!dedup.is_duplicate("b"));
    // overlapping next page repeats one
    assert!(dedup.is_duplicate("b"));
    assert!(!dedup.is_duplicate("c"));
    assert_eq!(dedup.seen_count(), 3);
}
