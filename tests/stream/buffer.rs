//! Integration tests for the stream buffer

use recflow_stream::{EventCollector, StreamBuffer, StreamEvent, StreamPipe};

use crate::feed;

fn record() -> Vec<StreamEvent> {
    vec![
        StreamEvent::start_record("1"),
        StreamEvent::start_entity("author"),
        StreamEvent::literal("name", "Goethe"),
        StreamEvent::EndEntity,
        StreamEvent::EndRecord,
    ]
}

#[test]
fn nothing_reaches_downstream_before_replay() {
    let mut buffer = StreamBuffer::new(EventCollector::new());
    feed(&mut buffer, &record()).unwrap();
    assert_eq!(buffer.len(), 5);
    assert!(buffer.receiver().is_empty());
}

#[test]
fn replay_twice_sends_twice() {
    let mut buffer = StreamBuffer::new(EventCollector::new());
    feed(&mut buffer, &record()).unwrap();
    buffer.replay().unwrap();
    buffer.replay().unwrap();
    assert_eq!(buffer.receiver().record_ids(), vec!["1", "1"]);
}

#[test]
fn replay_after_clear_is_silent() {
    let mut buffer = StreamBuffer::new(EventCollector::new());
    feed(&mut buffer, &record()).unwrap();
    buffer.clear();
    buffer.replay().unwrap();
    assert!(buffer.into_receiver().is_empty());
}

#[test]
fn close_discards_and_forwards() {
    let mut buffer = StreamBuffer::new(EventCollector::new());
    feed(&mut buffer, &record()[..2]).unwrap();
    feed(&mut buffer, &[StreamEvent::CloseStream]).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(buffer.receiver().events(), &[StreamEvent::CloseStream]);
}
