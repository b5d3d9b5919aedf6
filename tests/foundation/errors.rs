//! Integration tests for error types

use recflow_foundation::{Error, ErrorContext, ErrorKind, StreamLimit};

#[test]
fn error_display_messages() {
    assert_eq!(
        Error::unknown_predicate("is_purple").to_string(),
        "unknown predicate: is_purple"
    );
    assert_eq!(
        Error::unsupported_object_type("RESOURCE").to_string(),
        "RESOURCE can not yet be decoded"
    );
    assert_eq!(
        Error::parse("unexpected '}'", 7).to_string(),
        "parse error at offset 7: unexpected '}'"
    );
}

#[test]
fn configuration_classification() {
    assert!(Error::invalid_regex("(", "unclosed group").is_configuration());
    assert!(Error::arity_mismatch("any_equal", 2, 1).is_configuration());
    assert!(!Error::nested_record("r2").is_configuration());
    assert!(!Error::entity_underflow().is_configuration());
}

#[test]
fn in_record_keeps_existing_context() {
    let err = Error::entity_underflow()
        .with_context(ErrorContext::new().with_source("validator").with_frame("author"))
        .in_record("r1");
    let context = err.context.unwrap();
    assert_eq!(context.record.as_deref(), Some("r1"));
    assert_eq!(context.source.as_deref(), Some("validator"));
    assert_eq!(context.stack, vec!["author"]);
}

#[test]
fn limit_exceeded_names_entity() {
    let err = Error::limit_exceeded(StreamLimit::MaxEntityDepth {
        limit: 2,
        entity: Some("deep".to_owned()),
    });
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(
        err.to_string(),
        "limit exceeded: max entity depth (2) exceeded at entity deep"
    );
}
