//! Integration tests for record construction and emission

use recflow_foundation::{ErrorKind, Record, Value};
use recflow_stream::{EventCollector, RecordBuilder, RecordEmitter, StreamEvent, StreamReceiver};

use crate::feed;

fn build(events: &[StreamEvent]) -> Vec<Record> {
    let mut builder = RecordBuilder::new();
    feed(&mut builder, events).unwrap();
    builder.finished().collect()
}

#[test]
fn nested_entities_become_hashes() {
    let records = build(&[
        StreamEvent::start_record("1"),
        StreamEvent::start_entity("author"),
        StreamEvent::literal("name", "Goethe"),
        StreamEvent::start_entity("born"),
        StreamEvent::literal("year", "1749"),
        StreamEvent::EndEntity,
        StreamEvent::EndEntity,
        StreamEvent::EndRecord,
    ]);
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].to_value().to_string(),
        "{author: {name: Goethe, born: {year: 1749}}}"
    );
}

#[test]
fn marked_entity_becomes_array() {
    let records = build(&[
        StreamEvent::start_record("1"),
        StreamEvent::start_entity("tags[]"),
        StreamEvent::literal("1", "a"),
        StreamEvent::literal("2", "b"),
        StreamEvent::EndEntity,
        StreamEvent::EndRecord,
    ]);
    assert_eq!(records[0].get("tags[]"), Some(&Value::from(vec!["a", "b"])));
}

#[test]
fn several_records_in_order() {
    let records = build(&[
        StreamEvent::start_record("a"),
        StreamEvent::EndRecord,
        StreamEvent::start_record("b"),
        StreamEvent::literal("k", "v"),
        StreamEvent::EndRecord,
    ]);
    let ids: Vec<_> = records.iter().map(Record::id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(records[0].is_empty());
}

#[test]
fn literal_outside_record_fails() {
    let mut builder = RecordBuilder::new();
    let err = builder.literal("k", "v").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EventOutsideRecord(_)));
}

#[test]
fn emit_then_build_preserves_record() {
    let mut record = Record::new("r");
    record.add_field("title", "Faust");
    record.add_field("subject", "drama");
    record.add_field("subject", "poetry");
    record.insert("tags[]", Value::from(vec!["x", "y"]));

    let mut builder = RecordBuilder::new();
    RecordEmitter::emit(&record, &mut builder).unwrap();
    let rebuilt: Vec<_> = builder.finished().collect();
    assert_eq!(rebuilt, vec![record]);
}

#[test]
fn emitter_repeats_plain_arrays() {
    let mut record = Record::new("r");
    record.insert("k", Value::from(vec!["1", "2"]));
    let mut collector = EventCollector::new();
    RecordEmitter::emit(&record, &mut collector).unwrap();
    assert_eq!(
        collector.events(),
        &[
            StreamEvent::start_record("r"),
            StreamEvent::literal("k", "1"),
            StreamEvent::literal("k", "2"),
            StreamEvent::EndRecord,
        ]
    );
}
