//! Integration tests for grouping triples into records

use recflow_foundation::ErrorKind;
use recflow_stream::{NestingValidator, RecordBuilder, StreamPipe};
use recflow_triples::{ObjectType, Triple, TripleCollect};

fn triples() -> Vec<Triple> {
    vec![
        Triple::new("S1", "title", "Faust"),
        Triple::entity("S1", "author", "{ name: Goethe, born: 1749 }"),
        Triple::new("S1", "subject", "drama"),
        Triple::new("S1", "subject", "poetry"),
        Triple::new("S2", "title", "Werther"),
    ]
}

#[test]
fn triples_become_records() {
    let mut collect = TripleCollect::new(NestingValidator::new(RecordBuilder::new()));
    collect.process_all(&triples()).unwrap();
    collect.close_stream().unwrap();

    let records: Vec<_> = collect.receiver_mut().receiver_mut().finished().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].to_string(),
        "S1: {title: Faust, author: {name: Goethe, born: 1749}, subject: [drama, poetry]}"
    );
    assert_eq!(records[1].to_string(), "S2: {title: Werther}");
}

#[test]
fn object_type_tags_are_case_insensitive() {
    assert_eq!(ObjectType::from_tag("entity"), ObjectType::Entity);
    assert_eq!(ObjectType::from_tag("String"), ObjectType::String);
    assert_eq!(ObjectType::from_tag("URI").tag(), "URI");
}

#[test]
fn unsupported_type_names_record() {
    let mut collect = TripleCollect::new(RecordBuilder::new());
    let triple = Triple::new("S9", "link", "http://x").with_object_type(ObjectType::from_tag("URI"));
    let err = collect.process(&triple).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnsupportedObjectType(_)));
    assert_eq!(err.context.unwrap().record.as_deref(), Some("S9"));
}
