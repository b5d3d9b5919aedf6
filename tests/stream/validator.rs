//! Integration tests for the nesting validator

use recflow_foundation::ErrorKind;
use recflow_stream::{
    EventCollector, NestingValidator, RecordBuilder, StreamEvent, StreamLimits, StreamPipe,
};

use crate::feed;

#[test]
fn well_formed_stream_passes_through() {
    let events = [
        StreamEvent::start_record("1"),
        StreamEvent::start_entity("a"),
        StreamEvent::start_entity("b"),
        StreamEvent::literal("x", "1"),
        StreamEvent::EndEntity,
        StreamEvent::EndEntity,
        StreamEvent::EndRecord,
        StreamEvent::CloseStream,
    ];
    let mut validator = NestingValidator::new(EventCollector::new());
    feed(&mut validator, &events).unwrap();
    assert_eq!(validator.into_receiver().into_events(), events);
}

fn rejection(events: &[StreamEvent]) -> ErrorKind {
    let mut validator = NestingValidator::new(EventCollector::new());
    feed(&mut validator, events).unwrap_err().kind
}

#[test]
fn violations_are_rejected() {
    assert!(matches!(
        rejection(&[StreamEvent::EndRecord]),
        ErrorKind::EventOutsideRecord(_)
    ));
    assert!(matches!(
        rejection(&[StreamEvent::start_record("1"), StreamEvent::start_record("2")]),
        ErrorKind::NestedRecord(_)
    ));
    assert!(matches!(
        rejection(&[StreamEvent::start_record("1"), StreamEvent::EndEntity]),
        ErrorKind::EntityUnderflow
    ));
    assert!(matches!(
        rejection(&[
            StreamEvent::start_record("1"),
            StreamEvent::start_entity("a"),
            StreamEvent::EndRecord,
        ]),
        ErrorKind::UnclosedEntities(1)
    ));
}

#[test]
fn depth_limit() {
    let limits = StreamLimits::default().with_max_entity_depth(1);
    let mut validator = NestingValidator::with_limits(EventCollector::new(), limits);
    let err = feed(
        &mut validator,
        &[
            StreamEvent::start_record("1"),
            StreamEvent::start_entity("a"),
            StreamEvent::start_entity("b"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(validator.depth(), 1);
}

#[test]
fn close_balances_downstream_builder() {
    let mut validator = NestingValidator::new(RecordBuilder::new());
    feed(
        &mut validator,
        &[
            StreamEvent::start_record("1"),
            StreamEvent::start_entity("a"),
            StreamEvent::literal("x", "1"),
            StreamEvent::CloseStream,
        ],
    )
    .unwrap();
    assert!(validator.open_record().is_none());
    assert!(!validator.receiver().is_open());
}
